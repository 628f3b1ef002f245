//! Pure projection of a [`Session`] into what a front end should show.
//!
//! Rendering code applies a [`ViewModel`] to its surface and never looks at
//! the session directly, so the state machine can be tested without one.

use crate::ingest::format_size;
use crate::state::{Phase, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCard {
    pub name: String,
    pub size_label: String,
    pub kind_label: String,
}

/// Upload area: either the picker or the attached file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadView {
    Picker {
        /// Why the last selection was rejected, shown inline.
        error: Option<String>,
    },
    Selected(FileCard),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitIndicator {
    Send,
    Spinner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    Empty,
    Loading,
    Error(String),
    Success(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub upload: UploadView,
    pub prompt_enabled: bool,
    pub submit_enabled: bool,
    pub remove_enabled: bool,
    pub submit_indicator: SubmitIndicator,
    pub result: ResultPanel,
}

impl ViewModel {
    pub fn from_session(session: &Session) -> Self {
        let loading = session.is_loading();

        let upload = match session.file() {
            Some(file) => UploadView::Selected(FileCard {
                name: file.name.clone(),
                size_label: format_size(file.size_bytes),
                kind_label: kind_label(&file.mime_type).to_string(),
            }),
            None => UploadView::Picker {
                error: session.error().map(str::to_string),
            },
        };

        let result = match session.phase() {
            Phase::Idle => ResultPanel::Empty,
            Phase::Loading => ResultPanel::Loading,
            Phase::Error => ResultPanel::Error(session.error().unwrap_or_default().to_string()),
            Phase::Success => ResultPanel::Success(session.result().to_string()),
        };

        Self {
            upload,
            prompt_enabled: !loading,
            submit_enabled: session.can_submit(),
            remove_enabled: session.file().is_some() && !loading,
            submit_indicator: if loading {
                SubmitIndicator::Spinner
            } else {
                SubmitIndicator::Send
            },
            result,
        }
    }

    pub fn has_file(&self) -> bool {
        matches!(self.upload, UploadView::Selected(_))
    }
}

pub fn kind_label(mime_type: &str) -> &'static str {
    match mime_type {
        "application/pdf" => "PDF document",
        "application/msword" => "Word document",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            "Word document"
        }
        "text/plain" => "Text file",
        "application/zip" | "application/x-zip-compressed" => "Zip archive",
        _ => "File",
    }
}
