use serde::Serialize;
use tracing::{info, warn};

use crate::ai::{GeminiClient, SimulatedClient};
use crate::error::{Error, Result};

/// Everything a provider needs for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub data_base64: String,
    pub prompt: String,
}

/// Where generation requests go. Chosen once at startup from whether an
/// API key is available.
#[derive(Clone)]
pub enum Provider {
    Live(GeminiClient),
    Simulated(SimulatedClient),
}

impl Provider {
    /// Pick the live provider when a non-blank key is given, otherwise fall
    /// back to demo mode.
    pub fn select(api_key: Option<&str>, model: &str) -> Self {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                info!(%model, "using live Gemini provider");
                Provider::Live(GeminiClient::new(key, model))
            }
            None => {
                warn!("no API key configured, running in demo mode");
                Provider::Simulated(SimulatedClient::new())
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Live(_) => "gemini",
            Provider::Simulated(_) => "demo",
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Provider::Live(client) => format!("Gemini ({})", client.model()),
            Provider::Simulated(_) => "Demo mode".to_string(),
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Provider::Simulated(_))
    }

    /// The non-fatal configuration problem behind demo mode, if any.
    pub fn configuration_notice(&self) -> Option<Error> {
        match self {
            Provider::Live(_) => None,
            Provider::Simulated(_) => Some(Error::Configuration(
                "No API key configured. Responses are simulated locally (demo mode).".to_string(),
            )),
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match self {
            Provider::Live(client) => client.generate(request).await,
            Provider::Simulated(client) => client.generate(request).await,
        }
    }
}
