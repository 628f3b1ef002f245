use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use docprompt_core::view::{FileCard, ResultPanel, SubmitIndicator, UploadView, ViewModel};
use crate::app::{App, Focus};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut current_text = String::new();

    while let Some((_, c)) = chars.next() {
        if c == '*' && chars.peek().map(|(_, c)| *c) == Some('*') {
            // Consume the second *
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;

            while let Some((_, c)) = chars.next() {
                if c == '*' && chars.peek().map(|(_, c)| *c) == Some('*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Hard-wrap `text` into rows of at most `width` chars and locate the
/// cursor (a char index) as `(column, row)`.
fn layout_input(text: &str, cursor: usize, width: usize) -> (Vec<String>, (u16, u16)) {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut col = 0usize;
    let mut cursor_pos = None;

    for (i, c) in text.chars().enumerate() {
        if i == cursor {
            cursor_pos = Some((col, rows.len() - 1));
        }
        if c == '\n' {
            rows.push(String::new());
            col = 0;
            continue;
        }
        if col == width {
            rows.push(String::new());
            col = 0;
            if i == cursor {
                cursor_pos = Some((0, rows.len() - 1));
            }
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        col += 1;
    }

    let (x, y) = cursor_pos.unwrap_or_else(|| {
        if col == width {
            (0, rows.len())
        } else {
            (col, rows.len() - 1)
        }
    });
    (rows, (x as u16, y as u16))
}

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let view = app.view_model();
    let banner = app.banner();

    let [header_area, banner_area, upload_area, prompt_area, result_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(if banner.is_some() { 3 } else { 0 }),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

    render_header(app, frame, header_area);
    if let Some(text) = banner {
        render_banner(&text, frame, banner_area);
    }
    render_upload(app, &view, frame, upload_area);
    render_prompt(app, &view, frame, prompt_area);
    render_result(app, &view, frame, result_area);
    render_footer(app, &view, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mode_color = if app.provider.is_simulated() { Color::Yellow } else { Color::Green };

    let title = Line::from(vec![
        Span::styled(" docprompt ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("[{}]", app.provider.display_name()),
            Style::default().fg(mode_color),
        ),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_banner(text: &str, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Info ")
        .title_bottom(Line::from(" Ctrl+B dismiss ").right_aligned());

    let banner = Paragraph::new(text.to_string())
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(banner, area);
}

fn render_upload(app: &App, view: &ViewModel, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Path && !view.has_file();
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Document ");

    match &view.upload {
        UploadView::Picker { error } => {
            let inner = block.inner(area);
            let input_width = inner.width.saturating_sub(6) as usize;
            let cursor_x = app.path_cursor.min(app.path_input.chars().count());

            // Single-line input: keep the cursor in view
            let skip = cursor_x.saturating_sub(input_width.saturating_sub(1));
            let visible: String = app.path_input.chars().skip(skip).take(input_width).collect();

            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Path: ", Style::default().fg(Color::Cyan)),
                    Span::raw(visible),
                ]),
                Line::from(Span::styled(
                    "Type or drop a file/folder path and press Enter. PDF, DOC, DOCX, TXT, .zip or a folder; max 10 MB per file.",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            if let Some(message) = error {
                lines.push(Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )));
            }

            frame.render_widget(Paragraph::new(lines).block(block), area);

            if focused {
                let x = inner.x + 6 + (cursor_x - skip) as u16;
                frame.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
            }
        }
        UploadView::Selected(card) => {
            let lines = file_card_lines(card, view.remove_enabled);
            frame.render_widget(Paragraph::new(lines).block(block), area);
        }
    }
}

fn file_card_lines(card: &FileCard, remove_enabled: bool) -> Vec<Line<'static>> {
    let remove_style = if remove_enabled {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    vec![
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(Color::Green)),
            Span::styled(card.name.clone(), Style::default().bold()),
        ]),
        Line::from(Span::styled(
            format!("{} · {}", card.kind_label, card.size_label),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled(" Ctrl+X ", remove_style),
            Span::styled(" remove file", Style::default().fg(Color::DarkGray)),
        ]),
    ]
}

fn render_prompt(app: &App, view: &ViewModel, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Prompt;
    let border_color = if !view.prompt_enabled {
        Color::DarkGray
    } else if focused {
        Color::Cyan
    } else {
        Color::Gray
    };

    let indicator = match view.submit_indicator {
        SubmitIndicator::Spinner => Span::styled(
            format!(" {} Generating… ", SPINNER[app.animation_frame % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        ),
        SubmitIndicator::Send if view.submit_enabled => Span::styled(
            " ➤ Enter to send ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        SubmitIndicator::Send => Span::styled(" ➤ send ", Style::default().fg(Color::DarkGray)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Prompt ")
        .title_bottom(Line::from(indicator).right_aligned());

    let inner = block.inner(area);
    let (rows, (cursor_x, cursor_y)) =
        layout_input(&app.prompt_input, app.prompt_cursor, inner.width as usize);

    let height = inner.height.max(1);
    let offset = cursor_y.saturating_sub(height - 1);

    let text_style = if view.prompt_enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = if app.prompt_input.is_empty() {
        Text::from(Span::styled(
            "Ask something about the document…",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(rows.into_iter().map(Line::from).collect::<Vec<_>>()).style(text_style)
    };

    let prompt = Paragraph::new(content).block(block).scroll((offset, 0));
    frame.render_widget(prompt, area);

    if focused && view.prompt_enabled {
        frame.set_cursor_position(Position::new(
            inner.x + cursor_x.min(inner.width.saturating_sub(1)),
            inner.y + cursor_y - offset,
        ));
    }
}

fn render_result(app: &App, view: &ViewModel, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Result ");

    let content: Text = match &view.result {
        ResultPanel::Empty => Text::from(Span::styled(
            "Attach a document, write a prompt, and press Enter. The answer will appear here.",
            Style::default().fg(Color::DarkGray),
        )),
        ResultPanel::Loading => loading_skeleton(app.animation_frame, block.inner(area).width),
        ResultPanel::Error(message) => Text::from(vec![
            Line::from(Span::styled("Error", Style::default().fg(Color::Red).bold())),
            Line::default(),
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
        ]),
        ResultPanel::Success(text) => {
            Text::from(text.lines().map(parse_markdown_line).collect::<Vec<_>>())
        }
    };

    let max_scroll = (content.height() as u16).saturating_sub(1);
    let result = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll.min(max_scroll), 0));
    frame.render_widget(result, area);
}

/// Placeholder bars shown while waiting; widths shift with the tick.
fn loading_skeleton(frame_idx: usize, width: u16) -> Text<'static> {
    const WIDTHS: [u16; 5] = [90, 75, 82, 60, 40];
    let width = width.saturating_sub(2).max(1);

    let lines: Vec<Line> = WIDTHS
        .iter()
        .enumerate()
        .map(|(i, pct)| {
            let shade = if (frame_idx + i) % 3 == 0 { Color::Gray } else { Color::DarkGray };
            let len = (width as u32 * *pct as u32 / 100).max(1) as usize;
            Line::from(Span::styled("█".repeat(len), Style::default().fg(shade)))
        })
        .collect();

    Text::from(lines)
}

fn render_footer(app: &App, view: &ViewModel, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![];
    match app.focus {
        Focus::Path if !view.has_file() => {
            hints.extend(vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" attach ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" clear ", label_style),
            ]);
        }
        _ => {
            if view.submit_enabled {
                hints.extend(vec![
                    Span::styled(" Enter ", key_style),
                    Span::styled(" send ", label_style),
                ]);
            }
            if view.prompt_enabled {
                hints.extend(vec![
                    Span::styled(" Alt+Enter ", key_style),
                    Span::styled(" newline ", label_style),
                ]);
            }
        }
    }
    if view.remove_enabled {
        hints.extend(vec![
            Span::styled(" Ctrl+X ", key_style),
            Span::styled(" remove ", label_style),
        ]);
    }
    hints.extend(vec![
        Span::styled(" Tab ", key_style),
        Span::styled(" focus ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Ctrl+C ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
