//! Error taxonomy shared by ingestion, packing, and providers.
//!
//! Every variant carries the message shown to the user, so callers reduce an
//! error to its display string with `to_string()`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bad file type, size, or an empty selection.
    #[error("{0}")]
    Validation(String),

    /// Reading or archiving the selected files failed.
    #[error("{0}")]
    Encoding(String),

    /// Network or API-level failure while generating.
    #[error("{0}")]
    Transport(String),

    /// Missing or unreadable settings. Never fatal.
    #[error("{0}")]
    Configuration(String),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Encoding(_) => "encoding",
            Error::Transport(_) => "transport",
            Error::Configuration(_) => "configuration",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Encoding(format!("Failed to read file: {}", err))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Encoding(format!("Failed to create archive: {}", err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Transport(format!("Could not parse the API response: {}", err))
        } else {
            Error::Transport(format!("Request to the generative API failed: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = Error::Validation("File too large".to_string());
        assert_eq!(err.to_string(), "File too large");
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn io_errors_become_encoding_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Encoding(ref msg) if msg.contains("gone")));
    }
}
