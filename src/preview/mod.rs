/// Image previews for the three display areas
///
/// This module handles:
/// - Decoding picked image files and downloaded result bytes
/// - Fitting them into a small square thumbnail
/// - Wrapping the pixels in an iced image handle
pub mod thumbnail;

use iced::widget::image::Handle;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// A decoded thumbnail ready to be drawn
#[derive(Debug, Clone)]
pub struct Preview {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl Preview {
    fn from_thumbnail(thumb: thumbnail::Thumbnail) -> Self {
        Self {
            handle: Handle::from_rgba(thumb.width, thumb.height, thumb.pixels),
            width: thumb.width,
            height: thumb.height,
        }
    }
}

/// Decode an image file into a preview
pub async fn load_file(path: PathBuf, size: u32) -> Result<Preview> {
    // Spawn blocking because decoding and resampling are CPU-bound
    let thumb = tokio::task::spawn_blocking(move || thumbnail::from_path(&path, size))
        .await
        .map_err(|e| Error::Task(e.to_string()))??;

    Ok(Preview::from_thumbnail(thumb))
}

/// Decode downloaded image bytes into a preview
pub async fn load_bytes(bytes: Vec<u8>, size: u32) -> Result<Preview> {
    let thumb = tokio::task::spawn_blocking(move || thumbnail::from_bytes(&bytes, size))
        .await
        .map_err(|e| Error::Task(e.to_string()))??;

    Ok(Preview::from_thumbnail(thumb))
}
