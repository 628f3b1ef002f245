pub mod ai;
pub mod archive;
pub mod config;
pub mod error;
pub mod ingest;
pub mod provider;
pub mod state;
pub mod view;

// Re-export main types for convenience
pub use ai::{GeminiClient, SimulatedClient};
pub use config::Config;
pub use error::{Error, Result};
pub use ingest::{InputFile, SelectedFile, MAX_FILE_SIZE};
pub use provider::{GenerationRequest, Provider};
pub use state::{Phase, Session};
pub use view::{ResultPanel, SubmitIndicator, UploadView, ViewModel};
