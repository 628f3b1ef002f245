//! UI-agnostic session state
//!
//! [`Session`] owns the attached file, the prompt, and the outcome of the last
//! generation. Front ends drive it only through its action methods and read
//! it back through accessors (or [`crate::view::ViewModel`]).
//!
//! Generation is split into [`Session::begin_submit`] and
//! [`Session::finish_submit`] so a front end can run the provider call on a
//! background task and keep handling events meanwhile.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::ingest::{self, InputFile, SelectedFile};
use crate::provider::{GenerationRequest, Provider};

/// Generation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    file: Option<SelectedFile>,
    prompt: String,
    result: String,
    error: Option<String>,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Replace the attached file with a new selection.
    ///
    /// Any selection returns the session to `Idle` and clears the previous
    /// outcome. On failure the file is cleared too and the message is kept in
    /// `error` for display. Refused while a request is in flight.
    pub fn select(&mut self, files: Vec<InputFile>) -> Result<()> {
        if self.is_loading() {
            return Err(busy());
        }

        self.phase = Phase::Idle;
        self.result.clear();
        self.error = None;

        match ingest::ingest(files) {
            Ok(file) => {
                info!(name = %file.name, mime_type = %file.mime_type, size = file.size_bytes, "file selected");
                self.file = Some(file);
                Ok(())
            }
            Err(err) => {
                warn!(kind = err.kind(), "file selection rejected: {}", err);
                self.file = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Load a file or folder from disk and select it.
    pub async fn select_path(&mut self, path: &Path) -> Result<()> {
        if self.is_loading() {
            return Err(busy());
        }

        match ingest::load_path(path).await {
            Ok(files) => self.select(files),
            Err(err) => {
                warn!(path = %path.display(), kind = err.kind(), "could not load path: {}", err);
                self.phase = Phase::Idle;
                self.result.clear();
                self.file = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.prompt.trim().is_empty() && !self.is_loading()
    }

    /// Enter `Loading` and hand back the request to send, or do nothing and
    /// return `None` when there is no file, the prompt is blank, or a request
    /// is already in flight.
    pub fn begin_submit(&mut self) -> Option<GenerationRequest> {
        if !self.can_submit() {
            debug!(phase = ?self.phase, "submit ignored");
            return None;
        }
        let file = self.file.as_ref()?;

        let request = GenerationRequest {
            file_name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size_bytes: file.size_bytes,
            data_base64: file.content_base64.clone(),
            prompt: self.prompt.clone(),
        };

        self.result.clear();
        self.error = None;
        self.phase = Phase::Loading;
        info!(file = %request.file_name, "generation started");

        Some(request)
    }

    /// Record the provider's outcome. Ignored unless a request is in flight.
    pub fn finish_submit(&mut self, outcome: Result<String>) {
        if !self.is_loading() {
            debug!("generation outcome arrived outside Loading, ignoring");
            return;
        }

        match outcome {
            Ok(text) if !text.trim().is_empty() => {
                info!(chars = text.len(), "generation succeeded");
                self.result = text;
                self.error = None;
                self.phase = Phase::Success;
            }
            Ok(_) => self.fail("The model returned an empty response.".to_string()),
            Err(err) => {
                warn!(kind = err.kind(), "generation failed: {}", err);
                self.fail(err.to_string());
            }
        }
    }

    fn fail(&mut self, message: String) {
        let message = if message.trim().is_empty() {
            "Something went wrong while generating a response.".to_string()
        } else {
            message
        };
        self.result.clear();
        self.error = Some(message);
        self.phase = Phase::Error;
    }

    /// Run one full generation against `provider`. Returns `false` when the
    /// submit was a no-op.
    pub async fn submit(&mut self, provider: &Provider) -> bool {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let outcome = provider.generate(&request).await;
        self.finish_submit(outcome);
        true
    }

    /// Drop the attached file and start over. Ignored while loading.
    pub fn remove_file(&mut self) {
        if self.is_loading() {
            return;
        }
        info!("file removed, session reset");
        self.file = None;
        self.prompt.clear();
        self.result.clear();
        self.error = None;
        self.phase = Phase::Idle;
    }
}

fn busy() -> Error {
    Error::Validation("Please wait for the current request to finish.".to_string())
}
