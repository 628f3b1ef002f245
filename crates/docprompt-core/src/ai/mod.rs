pub mod gemini;
pub mod simulated;

pub use gemini::GeminiClient;
pub use simulated::SimulatedClient;
