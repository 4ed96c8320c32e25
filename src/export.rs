use crate::encoded::EncodedImage;
use crate::intake::SourceImage;
use anyhow::Context;
use std::path::Path;

const FALLBACK_NAME: &str = "image.png";

/// File name offered when downloading a result: the source name prefixed
/// with `enhanced-`.
pub fn download_file_name(source: Option<&SourceImage>) -> String {
    let name = source
        .map(|s| s.display_name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_NAME);
    format!("enhanced-{name}")
}

/// Decode `result` and write the raw image bytes to `path`.
pub fn write_result(path: &Path, result: &EncodedImage) -> anyhow::Result<()> {
    let bytes = result.decode().context("decode enhancement result")?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved enhanced image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_prefixed() {
        let source = SourceImage {
            encoded: EncodedImage::encode("image/png", b"x"),
            media_type: "image/png".into(),
            display_name: "photo.png".into(),
        };
        assert_eq!(download_file_name(Some(&source)), "enhanced-photo.png");
        assert_eq!(download_file_name(None), "enhanced-image.png");
    }
}
