use base64::{engine::general_purpose, Engine as _};
use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("encoded image has no payload segment")]
    MissingPayload,
    #[error("encoded image payload is not valid base64: {0}")]
    Base64(String),
}

/// Self-describing encoded image: `data:<media-type>;base64,<payload>`.
///
/// Usable both as a display source and for a lossless round trip back to
/// the original bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        Self::from_base64_parts(media_type, &general_purpose::STANDARD.encode(bytes))
    }

    /// Wrap an already base64 encoded payload without re-encoding it.
    pub fn from_base64_parts(media_type: &str, payload: &str) -> Self {
        Self(format!("data:{media_type};base64,{payload}"))
    }

    /// Take a string as-is. Nothing is validated until the payload is used.
    pub fn from_raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw payload: the segment after the first comma, if non-empty.
    pub fn payload(&self) -> Option<&str> {
        self.0.split(',').nth(1).filter(|p| !p.is_empty())
    }

    /// Media type declared in the prefix, e.g. `image/png`.
    pub fn media_type(&self) -> Option<&str> {
        let header = self.0.strip_prefix("data:")?.split(',').next()?;
        let media = header.split(';').next()?;
        (!media.is_empty()).then_some(media)
    }

    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        let payload = self.payload().ok_or(DecodeError::MissingPayload)?;
        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| DecodeError::Base64(e.to_string()))
    }

    /// File extension matching the declared media type.
    pub fn file_extension(&self) -> &'static str {
        extension_for_media_type(self.media_type().unwrap_or(""))
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payloads run into megabytes; only show the header and size.
        f.debug_struct("EncodedImage")
            .field("media_type", &self.media_type())
            .field("payload_len", &self.payload().map(str::len).unwrap_or(0))
            .finish()
    }
}

pub fn extension_for_media_type(media_type: &str) -> &'static str {
    match media_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_and_inspect() {
        let img = EncodedImage::encode("image/png", b"\x89PNG");
        assert_eq!(img.as_str(), "data:image/png;base64,iVBORw==");
        assert_eq!(img.media_type(), Some("image/png"));
        assert_eq!(img.payload(), Some("iVBORw=="));
        assert_eq!(img.decode().unwrap(), b"\x89PNG");
    }

    #[test]
    fn missing_payload_segment() {
        assert_eq!(EncodedImage::from_raw("data:image/png;base64").payload(), None);
        assert_eq!(EncodedImage::from_raw("data:image/png;base64,").payload(), None);
        assert_eq!(
            EncodedImage::from_raw("garbage").decode(),
            Err(DecodeError::MissingPayload)
        );
    }

    #[test]
    fn extension_follows_media_type() {
        assert_eq!(EncodedImage::encode("image/jpeg", b"x").file_extension(), "jpg");
        assert_eq!(EncodedImage::from_raw("nonsense").file_extension(), "png");
    }
}
