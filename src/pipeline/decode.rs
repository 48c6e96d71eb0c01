//! Upload decoding: raw bytes → [`ImageInput`].
//!
//! Only PNG and JPEG are accepted, matching the upload form. The format is
//! sniffed from the magic bytes rather than trusted from the file name or the
//! browser-supplied content type.

use crate::error::ItemError;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

/// One uploaded file, as received.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Set when the file was refused while receiving it (e.g. over the size
    /// cap). The bytes are dropped and the upload decodes to an error row.
    pub rejected: Option<String>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            rejected: None,
        }
    }

    /// An upload that keeps its place in the batch but is never decoded.
    pub fn rejected(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: Vec::new(),
            rejected: Some(reason.into()),
        }
    }
}

/// A decoded image ready for the encoder.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub file_name: String,
    pub image: DynamicImage,
    pub format: ImageFormat,
}

/// Raster formats accepted for upload.
pub const ACCEPTED_FORMATS: [ImageFormat; 2] = [ImageFormat::Png, ImageFormat::Jpeg];

/// File extensions offered by the upload control.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Decode an upload into an [`ImageInput`].
pub fn decode_upload(upload: &Upload) -> Result<ImageInput, ItemError> {
    if let Some(ref reason) = upload.rejected {
        return Err(ItemError::InvalidImage {
            detail: format!("'{}': {}", upload.file_name, reason),
        });
    }

    let format = image::guess_format(&upload.bytes).map_err(|e| ItemError::InvalidImage {
        detail: format!("'{}': {}", upload.file_name, e),
    })?;

    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(ItemError::InvalidImage {
            detail: format!(
                "'{}': unsupported format {:?} (expected PNG or JPEG)",
                upload.file_name, format
            ),
        });
    }

    let image = image::load_from_memory_with_format(&upload.bytes, format).map_err(|e| {
        ItemError::InvalidImage {
            detail: format!("'{}': {}", upload.file_name, e),
        }
    })?;

    debug!(
        "Decoded '{}' ({:?}) → {}x{} px",
        upload.file_name,
        format,
        image.width(),
        image.height()
    );

    Ok(ImageInput {
        file_name: upload.file_name.clone(),
        image,
        format,
    })
}
