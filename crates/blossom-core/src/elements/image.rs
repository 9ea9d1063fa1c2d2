//! Image element configuration and upload encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image format of an uploaded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// How the image fills its element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

/// Errors raised while encoding an uploaded image.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("Unsupported image format")]
    UnsupportedFormat,
}

/// Configuration for an image element.
///
/// `image_url` stays `None` until an image is uploaded; the renderer shows a
/// placeholder meanwhile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageConfig {
    pub image_url: Option<String>,
    pub alt_text: String,
    pub object_fit: ObjectFit,
}

impl ImageConfig {
    /// Encode raw image bytes as a `data:` URL.
    ///
    /// The format is sniffed from the payload, falling back to the file
    /// extension of `file_name`.
    pub fn from_bytes(data: &[u8], file_name: &str, max_bytes: usize) -> Result<Self, ImageError> {
        use base64::{Engine, engine::general_purpose::STANDARD};

        if data.len() > max_bytes {
            return Err(ImageError::TooLarge {
                size: data.len(),
                limit: max_bytes,
            });
        }

        let format = ImageFormat::from_magic_bytes(data)
            .or_else(|| {
                file_name
                    .rsplit_once('.')
                    .and_then(|(_, ext)| ImageFormat::from_extension(ext))
            })
            .ok_or(ImageError::UnsupportedFormat)?;

        Ok(Self {
            image_url: Some(format!(
                "data:{};base64,{}",
                format.mime_type(),
                STANDARD.encode(data)
            )),
            alt_text: file_name.to_string(),
            object_fit: ObjectFit::Contain,
        })
    }

    /// Whether an image has been uploaded.
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}
