use image::{imageops::FilterType, DynamicImage};
use std::path::Path;

use crate::error::Result;

/// RGBA pixels of a downscaled image
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode a file on disk and shrink it to fit `size`×`size`
pub fn from_path(path: &Path, size: u32) -> Result<Thumbnail> {
    let img = image::open(path)?;
    tracing::debug!(path = %path.display(), width = img.width(), height = img.height(), "Decoded image");
    Ok(fit(img, size))
}

/// Decode in-memory bytes (format sniffed from the header)
pub fn from_bytes(bytes: &[u8], size: u32) -> Result<Thumbnail> {
    let img = image::load_from_memory(bytes)?;
    tracing::debug!(bytes = bytes.len(), width = img.width(), height = img.height(), "Decoded image");
    Ok(fit(img, size))
}

/// Shrink preserving aspect ratio; never upscales
pub fn fit(img: DynamicImage, size: u32) -> Thumbnail {
    let img = if img.width() > size || img.height() > size {
        img.resize(size, size, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = img.into_rgba8();
    Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    }
}
