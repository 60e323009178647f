#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error: {status}")]
    Status { status: u16, body: String },

    #[error("Stream read error: {0}")]
    Stream(String),
}
