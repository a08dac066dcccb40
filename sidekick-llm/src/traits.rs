//! Core abstractions shared by every chat-completion provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sidekick_common::Result;

use crate::image::ImageSource;

/// What a caller wants the model to look at.
///
/// Text-only and image-carrying requests get different wire encodings, so the
/// two shapes are explicit at the call site rather than hidden behind an
/// optional parameter.
#[derive(Debug, Clone)]
pub enum Prompt {
    /// Plain instruction or question.
    Text(String),
    /// Instruction plus one image the model should inspect.
    WithImage { text: String, image: ImageSource },
}

impl Prompt {
    /// Convenience constructor for the common text-only case.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Instruction plus an image file on disk.
    pub fn with_image_file(
        text: impl Into<String>,
        path: impl Into<std::path::PathBuf>,
    ) -> Self {
        Self::WithImage {
            text: text.into(),
            image: ImageSource::File(path.into()),
        }
    }

    /// The textual part, whichever variant this is.
    pub fn instruction(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::WithImage { text, .. } => text,
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(self, Self::WithImage { .. })
    }
}

/// Response from a completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    /// Model the provider reports having served the request with.
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

/// Common interface over chat-completion providers.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(
        &self,
        prompt: &Prompt,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Whether the provider is reachable with the configured credentials.
    async fn health_check(&self) -> Result<bool>;

    /// Model this client sends requests for.
    fn model_name(&self) -> &str;

    /// One-line helper for plain text prompts.
    async fn ask(&self, prompt: &str) -> Result<String> {
        let response = self
            .generate(&Prompt::text(prompt), None, None, None)
            .await?;
        Ok(response.text)
    }

    /// Ask a question about a single image.
    async fn ask_about_image(&self, question: &str, image: ImageSource) -> Result<String> {
        let prompt = Prompt::WithImage {
            text: question.to_string(),
            image,
        };
        Ok(self.generate(&prompt, None, None, None).await?.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_is_variant_independent() {
        assert_eq!(Prompt::text("hi").instruction(), "hi");

        let with_image = Prompt::with_image_file("describe", "/tmp/shot.png");
        assert_eq!(with_image.instruction(), "describe");
        assert!(with_image.has_image());
        assert!(!Prompt::text("hi").has_image());
    }
}
