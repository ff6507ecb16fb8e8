//! # Gradio Client
//!
//! Just enough of the Gradio HTTP protocol to upload files, call one
//! endpoint and fetch the files it returns.
//!
//! ## Modules
//!
//! - [`client`] - HTTP client bound to one Gradio app
//! - [`sse`] - Parsing of the `/call` result event stream
//! - [`types`] - JSON payloads exchanged with the app

pub mod client;
pub mod sse;
pub mod types;

pub use client::GradioClient;
pub use types::FileData;
