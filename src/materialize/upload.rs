//! Player-supplied image files

use std::path::{Path, PathBuf};

use crate::error::MaterializeError;
use crate::state::data::{EncodedImage, ImageEntry};

/// A picked or dropped file that passed the image filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: &'static str,
}

/// MIME type inferred from the file extension
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    if ext == "svg" {
        return Some("image/svg+xml");
    }
    image::ImageFormat::from_extension(&ext).map(|format| format.to_mime_type())
}

/// Keep only files whose MIME type is `image/*`, in the order given
pub fn accept(paths: impl IntoIterator<Item = PathBuf>) -> Vec<UploadFile> {
    paths
        .into_iter()
        .filter_map(|path| {
            let mime = mime_for(&path).filter(|mime| mime.starts_with("image/"));
            let Some(mime) = mime else {
                tracing::debug!(path = %path.display(), "dropping non-image upload");
                return None;
            };

            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            Some(UploadFile { path, name, mime })
        })
        .collect()
}

/// Read an upload as-is into a self-contained entry (no re-encode)
pub async fn read_upload(file: UploadFile) -> Result<ImageEntry, MaterializeError> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|source| MaterializeError::Read {
            path: file.path.clone(),
            source,
        })?;

    Ok(ImageEntry::new(EncodedImage::new(file.mime, bytes), file.name))
}
