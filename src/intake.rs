use crate::encoded::EncodedImage;
use crate::task::{self, Pending, Waker};
use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The user's uploaded photo. Replaced wholesale on every upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub encoded: EncodedImage,
    pub media_type: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{display_name}' is not an image (declared type '{media_type}')")]
pub struct InvalidInputError {
    pub display_name: String,
    pub media_type: String,
}

#[derive(Debug, Clone)]
pub enum BlobContents {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A user supplied file: declared media type, display name, and a way to
/// get at its contents.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub name: String,
    pub media_type: String,
    pub contents: BlobContents,
}

impl ImageBlob {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            media_type: media_type_for_path(&path).into(),
            contents: BlobContents::Path(path),
        }
    }

    pub fn from_bytes(name: &str, media_type: &str, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            contents: BlobContents::Bytes(bytes.into()),
        }
    }

    /// Convert a file dropped onto the window. Native drops only carry a
    /// path, so the media type is inferred from its extension there.
    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        if let Some(bytes) = &file.bytes {
            let media_type = if file.mime.is_empty() {
                media_type_for_path(Path::new(&file.name)).to_string()
            } else {
                file.mime.clone()
            };
            return Some(Self::from_bytes(&file.name, &media_type, bytes.clone()));
        }
        let path = file.path.clone()?;
        let mut blob = Self::from_path(path);
        if !file.mime.is_empty() {
            blob.media_type = file.mime.clone();
        }
        Some(blob)
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    fn read(&self) -> anyhow::Result<Vec<u8>> {
        match &self.contents {
            BlobContents::Path(path) => Ok(std::fs::read(path)?),
            BlobContents::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Media type implied by a file extension; anything unrecognised is
/// reported as opaque binary.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

pub type PendingIntake = Pending<anyhow::Result<SourceImage>>;

/// Validate `blob` and start reading it in the background.
///
/// Rejected blobs never start a read, so no image state changes.
pub fn submit(blob: ImageBlob, waker: Option<Waker>) -> Result<PendingIntake, InvalidInputError> {
    if !blob.is_image() {
        tracing::info!(name = %blob.name, media_type = %blob.media_type, "rejected non-image upload");
        return Err(InvalidInputError {
            display_name: blob.name,
            media_type: blob.media_type,
        });
    }
    Ok(task::spawn("image-intake", waker, move || {
        let bytes = blob.read()?;
        Ok(SourceImage {
            encoded: EncodedImage::encode(&blob.media_type, &bytes),
            media_type: blob.media_type,
            display_name: blob.name,
        })
    }))
}
