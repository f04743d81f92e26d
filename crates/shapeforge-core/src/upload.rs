//! Upload validation for model files

use std::path::Path;
use thiserror::Error;

use crate::geometry::ShapeReference;

/// Extensions accepted by the upload picker, lowercase
pub const MODEL_EXTENSIONS: [&str; 2] = ["glb", "gltf"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unsupported file type: {filename}. Please upload a .glb or .gltf file.")]
    UnsupportedExtension { filename: String },
    #[error("Uploaded file is empty: {0}")]
    Empty(String),
}

/// Value for an HTML `accept` attribute
pub fn accept_attribute() -> String {
    MODEL_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

/// Accept only `.glb` and `.gltf`, case-insensitively
pub fn validate_model_file(filename: &str) -> Result<(), UploadError> {
    let supported = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MODEL_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(UploadError::UnsupportedExtension {
            filename: filename.to_string(),
        })
    }
}

/// Validate an uploaded file and build the reference to open it with.
///
/// `id` must be unique for the session; the caller registers the bytes at
/// [`upload_asset_path`](crate::geometry::upload_asset_path).
pub fn accept_upload(id: u64, filename: &str, bytes: &[u8]) -> Result<ShapeReference, UploadError> {
    validate_model_file(filename)?;
    if bytes.is_empty() {
        return Err(UploadError::Empty(filename.to_string()));
    }
    Ok(ShapeReference::uploaded(id, filename))
}
