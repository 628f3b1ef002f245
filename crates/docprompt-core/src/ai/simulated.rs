use std::time::Duration;

use crate::error::Result;
use crate::ingest::format_size;
use crate::provider::GenerationRequest;

/// Local stand-in used when no API key is configured. Produces a
/// placeholder answer after a short pause so the loading state is visible.
#[derive(Clone, Debug)]
pub struct SimulatedClient {
    delay: Duration,
}

impl SimulatedClient {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(800);

    pub fn new() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(placeholder_response(request))
    }
}

impl Default for SimulatedClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn placeholder_response(request: &GenerationRequest) -> String {
    let mut text = String::new();

    text.push_str("**Demo mode** (no API key configured)\n\n");
    text.push_str(&format!(
        "File: {} ({}, {})\n",
        request.file_name,
        request.mime_type,
        format_size(request.size_bytes)
    ));
    text.push_str(&format!("Prompt: {}\n\n", request.prompt));
    text.push_str("This answer was generated locally and the document was not sent anywhere. ");
    text.push_str("Set GEMINI_API_KEY, pass --api-key, or add \"api_key\" to the config file ");
    text.push_str("to get a real response from the model.");

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            file_name: "report.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 2 * 1024 * 1024,
            data_base64: String::new(),
            prompt: "Summarize the key findings".to_string(),
        }
    }

    #[test]
    fn placeholder_quotes_file_and_prompt() {
        let text = placeholder_response(&request());
        assert!(text.contains("report.pdf"));
        assert!(text.contains("Summarize the key findings"));
        assert!(text.contains("2 MB"));
    }

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        let client = SimulatedClient::with_delay(Duration::ZERO);
        let text = client.generate(&request()).await.unwrap();
        assert!(text.starts_with("**Demo mode**"));
    }
}
