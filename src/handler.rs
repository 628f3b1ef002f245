use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, Focus};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await,
        AppEvent::Paste(text) => handle_paste(app, &text).await,
        AppEvent::Resize => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
    app.poll_generation().await;
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work regardless of focus
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('b') if ctrl => {
            app.dismiss_banner();
            return;
        }
        KeyCode::Char('x') if ctrl => {
            app.remove_file();
            return;
        }
        KeyCode::Tab => {
            app.toggle_focus();
            return;
        }
        KeyCode::PageDown => {
            app.scroll_result_down(10);
            return;
        }
        KeyCode::PageUp => {
            app.scroll_result_up(10);
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Path => handle_path_editing(app, key).await,
        Focus::Prompt => handle_prompt_editing(app, key),
    }
}

async fn handle_paste(app: &mut App, text: &str) {
    if !app.session.is_loading() {
        if let Some(path) = app.pasted_path(text) {
            app.select_path(&path).await;
            return;
        }
    }

    match app.focus {
        Focus::Path => {
            for c in text.chars().filter(|c| !c.is_control()) {
                insert_char(&mut app.path_input, &mut app.path_cursor, c);
            }
        }
        Focus::Prompt => {
            if app.session.is_loading() {
                return;
            }
            for c in text.chars().filter(|c| *c == '\n' || !c.is_control()) {
                insert_char(&mut app.prompt_input, &mut app.prompt_cursor, c);
            }
            app.sync_prompt();
        }
    }
}

async fn handle_path_editing(app: &mut App, key: KeyEvent) {
    if app.session.file().is_some() {
        // Picker is hidden once a file is attached
        app.focus = Focus::Prompt;
        return;
    }

    match key.code {
        KeyCode::Enter => {
            if !app.session.is_loading() {
                app.select_from_input().await;
            }
        }
        KeyCode::Esc => {
            app.path_input.clear();
            app.path_cursor = 0;
        }
        _ => {
            edit_line(&mut app.path_input, &mut app.path_cursor, key);
        }
    }
}

fn handle_prompt_editing(app: &mut App, key: KeyEvent) {
    // Prompt is read-only while a request is in flight
    if app.session.is_loading() {
        return;
    }

    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            insert_char(&mut app.prompt_input, &mut app.prompt_cursor, '\n');
            app.sync_prompt();
        }
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Esc => {
            if app.session.file().is_none() {
                app.focus = Focus::Path;
            }
        }
        _ => {
            if edit_line(&mut app.prompt_input, &mut app.prompt_cursor, key) {
                app.sync_prompt();
            }
        }
    }
}

fn insert_char(input: &mut String, cursor: &mut usize, c: char) {
    let byte_pos = char_to_byte_index(input, *cursor);
    input.insert(byte_pos, c);
    *cursor += 1;
}

/// Apply a line-editing key to `input`. Returns whether the text changed.
fn edit_line(input: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
                return true;
            }
        }
        KeyCode::Delete => {
            let char_count = input.chars().count();
            if *cursor < char_count {
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
                return true;
            }
        }
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = input.chars().count();
            *cursor = (*cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = input.chars().count();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            insert_char(input, cursor, c);
            return true;
        }
        _ => {}
    }
    false
}
