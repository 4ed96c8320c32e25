pub mod gemini;

use crate::encoded::EncodedImage;
use crate::intake::SourceImage;

pub use gemini::{ConfigError, GeminiTransport};

pub const INVALID_CREDENTIAL_MARKER: &str = "API key not valid";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnhancementError {
    #[error("Invalid base64 image data")]
    InvalidSourceEncoding,
    #[error("AI did not return an image. It might have refused the request.")]
    NoImageReturned,
    #[error("The provided API key is not valid. Please check your configuration.")]
    InvalidCredential,
    #[error("An error occurred while enhancing the image: {0}")]
    Service(String),
    #[error("An unknown error occurred while enhancing the image.")]
    Unknown,
}

impl EnhancementError {
    /// Normalise a transport or service failure message.
    pub fn from_failure_message(message: &str) -> Self {
        let message = message.trim();
        if message.is_empty() {
            Self::Unknown
        } else if message.contains(INVALID_CREDENTIAL_MARKER) {
            Self::InvalidCredential
        } else {
            Self::Service(message.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Image,
    Text,
}

/// One logical call to the generative service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Base64 payload, passed through without re-encoding.
    pub image_payload: String,
    pub media_type: String,
    pub instruction: String,
    pub modalities: Vec<Modality>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Base64 payload as returned by the service.
    pub data: String,
    pub media_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPart {
    pub inline_image: Option<InlineImage>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub parts: Vec<ContentPart>,
}

impl GenerateResponse {
    pub fn first_image(&self) -> Option<&InlineImage> {
        self.parts.iter().find_map(|p| p.inline_image.as_ref())
    }
}

/// Whatever actually talks to the generative service.
pub trait GenerativeTransport: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
}

/// Produces an enhanced image for a source and an instruction.
pub trait Enhance: Send + Sync {
    fn enhance(
        &self,
        source: &SourceImage,
        instruction: &str,
    ) -> Result<EncodedImage, EnhancementError>;
}

/// Stateless wrapper turning a transport into single-attempt enhancements.
pub struct EnhancementClient<T> {
    transport: T,
}

impl<T: GenerativeTransport> EnhancementClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: GenerativeTransport> Enhance for EnhancementClient<T> {
    fn enhance(
        &self,
        source: &SourceImage,
        instruction: &str,
    ) -> Result<EncodedImage, EnhancementError> {
        let payload = source
            .encoded
            .payload()
            .ok_or(EnhancementError::InvalidSourceEncoding)?;

        let request = GenerateRequest {
            image_payload: payload.to_string(),
            media_type: source.media_type.clone(),
            instruction: instruction.to_string(),
            modalities: vec![Modality::Image, Modality::Text],
        };

        let response = self.transport.generate(&request).map_err(|e| {
            tracing::error!("enhancement request failed: {e:#}");
            EnhancementError::from_failure_message(&format!("{e:#}"))
        })?;

        match response.first_image() {
            Some(image) => Ok(EncodedImage::from_base64_parts(&image.media_type, &image.data)),
            None => {
                let text: Vec<&str> = response.parts.iter().filter_map(|p| p.text.as_deref()).collect();
                tracing::warn!(reply = ?text, "service returned no image");
                Err(EnhancementError::NoImageReturned)
            }
        }
    }
}
