use std::path::{Path, PathBuf};

use docprompt_core::ingest::normalize_dropped_path;
use docprompt_core::{Config, Error, Provider, Session, ViewModel};
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Path input of the upload picker
    Path,
    Prompt,
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,

    pub session: Session,
    pub provider: Provider,
    pub config: Config,

    // Input buffers (cursor positions are char indices)
    pub path_input: String,
    pub path_cursor: usize,
    pub prompt_input: String,
    pub prompt_cursor: usize,

    pub result_scroll: u16,
    pub animation_frame: usize,

    // In-flight generation, at most one
    pub generate_task: Option<JoinHandle<docprompt_core::Result<String>>>,
}

impl App {
    pub fn new(session: Session, provider: Provider, config: Config) -> Self {
        let prompt_input = session.prompt().to_string();
        let focus = if session.file().is_some() {
            Focus::Prompt
        } else {
            Focus::Path
        };

        Self {
            should_quit: false,
            focus,
            session,
            provider,
            config,
            path_input: String::new(),
            path_cursor: 0,
            prompt_cursor: prompt_input.chars().count(),
            prompt_input,
            result_scroll: 0,
            animation_frame: 0,
            generate_task: None,
        }
    }

    pub fn view_model(&self) -> ViewModel {
        ViewModel::from_session(&self.session)
    }

    /// Attach whatever the path input holds.
    pub async fn select_from_input(&mut self) {
        let raw = self.path_input.clone();
        if raw.trim().is_empty() {
            return;
        }
        self.select_path(&normalize_dropped_path(&raw)).await;
    }

    pub async fn select_path(&mut self, path: &Path) {
        self.result_scroll = 0;
        if self.session.select_path(path).await.is_ok() {
            self.path_input.clear();
            self.path_cursor = 0;
            self.focus = Focus::Prompt;
        }
    }

    /// A single-line paste that names an existing file or folder counts as a
    /// drop. Outside the open picker only absolute paths (or `file://` URLs)
    /// qualify, so pasted prompt text is never mistaken for a path.
    pub fn pasted_path(&self, text: &str) -> Option<PathBuf> {
        if text.trim().lines().count() != 1 {
            return None;
        }

        let path = normalize_dropped_path(text);
        let picker_open = self.focus == Focus::Path && self.session.file().is_none();
        if !picker_open && !path.is_absolute() {
            return None;
        }

        path.exists().then_some(path)
    }

    pub fn sync_prompt(&mut self) {
        self.session.set_prompt(self.prompt_input.clone());
    }

    /// Start a generation in the background. No-op unless the session
    /// accepts the submit.
    pub fn submit(&mut self) {
        if self.generate_task.is_some() {
            return;
        }
        let Some(request) = self.session.begin_submit() else {
            return;
        };

        self.result_scroll = 0;
        self.animation_frame = 0;

        let provider = self.provider.clone();
        self.generate_task = Some(tokio::spawn(async move {
            provider.generate(&request).await
        }));
    }

    /// Hand a finished generation back to the session.
    pub async fn poll_generation(&mut self) {
        let finished = self
            .generate_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.generate_task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("generation task failed: {}", e);
                    Err(Error::Transport(format!("The request was interrupted: {}", e)))
                }
            };
            self.session.finish_submit(outcome);
        }
    }

    pub fn remove_file(&mut self) {
        if self.session.is_loading() {
            return;
        }
        self.session.remove_file();
        self.prompt_input.clear();
        self.prompt_cursor = 0;
        self.result_scroll = 0;
        self.focus = Focus::Path;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Path => Focus::Prompt,
            // The path input is only on screen while no file is attached
            Focus::Prompt if self.session.file().is_none() => Focus::Path,
            Focus::Prompt => Focus::Prompt,
        };
    }

    pub fn banner(&self) -> Option<String> {
        if self.config.banner_dismissed {
            return None;
        }
        Some(match self.provider.configuration_notice() {
            Some(notice) => format!(
                "{} Set GEMINI_API_KEY or pass --api-key to use the live model.",
                notice
            ),
            None => format!(
                "Using {}. Attach a PDF, DOC, DOCX or TXT file, a .zip, or a folder (up to 10 MB per file).",
                self.provider.display_name()
            ),
        })
    }

    pub fn dismiss_banner(&mut self) {
        debug!("banner dismissed");
        self.config.dismiss_banner();
    }

    pub fn tick_animation(&mut self) {
        if self.session.is_loading() {
            self.animation_frame = self.animation_frame.wrapping_add(1);
        }
    }

    pub fn scroll_result_down(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_add(lines);
    }

    pub fn scroll_result_up(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docprompt_core::{InputFile, Phase, SimulatedClient};
    use std::time::Duration;

    fn demo_app() -> App {
        let provider = Provider::Simulated(SimulatedClient::with_delay(Duration::ZERO));
        App::new(Session::new(), provider, Config::new())
    }

    #[tokio::test]
    async fn submit_runs_in_background_and_lands_in_session() {
        let mut app = demo_app();
        app.session
            .select(vec![InputFile::new("report.pdf", vec![1; 64])])
            .unwrap();
        app.prompt_input = "Summarize".to_string();
        app.sync_prompt();

        app.submit();
        assert_eq!(app.session.phase(), Phase::Loading);

        // A second submit while loading changes nothing
        app.submit();

        while app.session.is_loading() {
            tokio::time::sleep(Duration::from_millis(5)).await;
            app.poll_generation().await;
        }

        assert_eq!(app.session.phase(), Phase::Success);
        assert!(app.session.result().contains("report.pdf"));
        assert!(app.generate_task.is_none());
    }

    #[test]
    fn remove_file_clears_prompt_buffer() {
        let mut app = demo_app();
        app.session
            .select(vec![InputFile::new("a.txt", b"x".to_vec())])
            .unwrap();
        app.prompt_input = "hello".to_string();
        app.prompt_cursor = 5;
        app.sync_prompt();

        app.remove_file();

        assert!(app.prompt_input.is_empty());
        assert_eq!(app.prompt_cursor, 0);
        assert_eq!(app.focus, Focus::Path);
        assert!(app.session.prompt().is_empty());
    }

    #[test]
    fn demo_banner_mentions_api_key_until_dismissed() {
        let mut app = demo_app();
        assert!(app.banner().unwrap().contains("GEMINI_API_KEY"));
        app.config.banner_dismissed = true;
        assert!(app.banner().is_none());
    }
}
