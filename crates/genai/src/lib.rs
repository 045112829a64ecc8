//! Generative content service: project descriptions and images.
//!
//! [`ContentGenerator`] is the seam the admin console calls through;
//! [`gemini::GeminiClient`] talks to the hosted Gemini/Imagen REST API.

pub mod error;
pub mod gemini;

use async_trait::async_trait;

pub use error::GenerationError;
pub use gemini::{GeminiClient, GeminiConfig};

/// A text and image generation backend.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate text for a single-turn prompt. The result is trimmed.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Generate `sample_count` images and return the first one as a base64
    /// payload (no `data:` prefix).
    async fn generate_image(
        &self,
        prompt: &str,
        sample_count: u32,
    ) -> Result<String, GenerationError>;
}
