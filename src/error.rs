//! Error types shared by every layer of the application
//!
//! Background tasks convert these to `String` before handing them
//! back to the UI as a `Message`, since iced messages must be `Clone`.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between picking files and showing a result
#[derive(Error, Debug)]
pub enum Error {
    /// Submit was requested before both images were chosen
    #[error("choose both a person image and a garment image first")]
    NotReady,

    /// A selected file disappeared between picking and submitting
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Network or HTTP transport failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status
    #[error("service error: {status} - {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The service reported a failure while running the model
    #[error("remote processing failed: {0}")]
    Remote(String),

    /// The service answered, but not in the shape we expect
    #[error("unexpected response format: {0}")]
    MalformedResponse(String),

    /// Image bytes could not be decoded
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// Local file access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking worker panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
