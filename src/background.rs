//! The background beneath the ink surface and sticker overlay.

#[cfg(test)]
#[path = "background_test.rs"]
mod background_test;

use image::RgbaImage;

use crate::error::UploadError;

/// What is shown under the ink.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Nothing loaded yet.
    Empty,
    /// The "select a map" placeholder image.
    Placeholder { url: String },
    /// A floor from the map catalog.
    MapFloor { map_id: String, floor: usize, url: String },
    /// A user-supplied image, decoded.
    Uploaded { image: RgbaImage, generation: u64 },
}

impl Background {
    /// Image reference for URL-backed backgrounds.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Placeholder { url } | Self::MapFloor { url, .. } => Some(url),
            Self::Empty | Self::Uploaded { .. } => None,
        }
    }

    /// Decoded pixels for uploaded backgrounds.
    #[must_use]
    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            Self::Uploaded { image, .. } => Some(image),
            _ => None,
        }
    }
}

/// Owns the current background and counts uploads.
#[derive(Debug)]
pub struct BackgroundSlot {
    current: Background,
    uploads: u64,
}

impl Default for BackgroundSlot {
    fn default() -> Self {
        Self { current: Background::Empty, uploads: 0 }
    }
}

impl BackgroundSlot {
    #[must_use]
    pub fn current(&self) -> &Background {
        &self.current
    }

    pub fn set(&mut self, background: Background) {
        self.current = background;
    }

    /// Install a decoded upload. The most recently applied image wins.
    /// Returns the upload generation.
    pub fn set_uploaded(&mut self, image: RgbaImage) -> u64 {
        self.uploads += 1;
        tracing::info!(width = image.width(), height = image.height(), generation = self.uploads, "background uploaded");
        self.current = Background::Uploaded { image, generation: self.uploads };
        self.uploads
    }
}

/// Whether a MIME type names an image.
#[must_use]
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Decode user-supplied bytes into RGBA pixels.
///
/// # Errors
///
/// [`UploadError::NotAnImage`] for a non-`image/*` MIME type and
/// [`UploadError::Decode`] when the bytes do not decode.
pub fn decode_upload(bytes: &[u8], mime: &str) -> Result<RgbaImage, UploadError> {
    if !is_image_mime(mime) {
        return Err(UploadError::NotAnImage(mime.to_string()));
    }
    let decoded = image::load_from_memory(bytes)?;
    Ok(decoded.to_rgba8())
}
