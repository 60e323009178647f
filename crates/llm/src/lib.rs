//! Upstream text generation.
//!
//! [`TextGenerator`] is the seam the backend talks to; [`GeminiClient`] is the
//! production implementation streaming from Google's Generative Language API.

mod error;
mod gemini;
pub mod sse;

use std::pin::Pin;

use futures::Stream;

pub use error::LlmError;
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};

/// Ordered text fragments as the provider produces them.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Start generating for `prompt`.
    ///
    /// Fails before yielding anything if the provider rejects the request.
    async fn stream_text(&self, prompt: &str) -> Result<TextStream, LlmError>;
}
