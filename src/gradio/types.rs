//! # Gradio Payloads
//!
//! Request and response types for the Gradio HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker Gradio uses to recognise file arguments
pub const FILE_DATA_TYPE: &str = "gradio.FileData";

/// Metadata block attached to every file argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    #[serde(rename = "_type")]
    pub kind: String,
}

impl Default for FileMeta {
    fn default() -> Self {
        Self {
            kind: FILE_DATA_TYPE.to_string(),
        }
    }
}

/// A file known to the Gradio server.
///
/// Inputs carry the server-side `path` returned by an upload; outputs
/// usually also carry a downloadable `url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    /// Path on the server's filesystem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Public URL of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Original file name on the uploader's machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_name: Option<String>,

    #[serde(default)]
    pub meta: FileMeta,
}

impl FileData {
    /// Reference to a file that has just been uploaded.
    pub fn uploaded(path: impl Into<String>, orig_name: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            url: None,
            orig_name: Some(orig_name.into()),
            meta: FileMeta::default(),
        }
    }

    /// True when there is some way to fetch the file.
    pub fn is_locatable(&self) -> bool {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.is_empty());
        present(&self.url) || present(&self.path)
    }
}

/// Body of `POST /call/{api}`.
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub data: Vec<Value>,
}

/// Response to `POST /call/{api}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallResponse {
    pub event_id: String,
}

/// The subset of `GET /config` we care about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Route prefix; `/gradio_api` on Gradio 5, absent on Gradio 4.
    #[serde(default)]
    pub api_prefix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uploaded_file_serialization() {
        let file = FileData::uploaded("/tmp/gradio/abc/person.jpg", "person.jpg");
        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({
                "path": "/tmp/gradio/abc/person.jpg",
                "orig_name": "person.jpg",
                "meta": { "_type": "gradio.FileData" }
            })
        );
    }

    #[test]
    fn test_output_file_deserialization_ignores_extra_fields() {
        let file: FileData = serde_json::from_value(json!({
            "path": "/tmp/gradio/out/0.png",
            "url": "https://example.hf.space/file=/tmp/gradio/out/0.png",
            "size": null,
            "mime_type": null,
            "is_stream": false
        }))
        .unwrap();

        assert!(file.is_locatable());
        assert_eq!(file.meta.kind, FILE_DATA_TYPE);
    }

    #[test]
    fn test_empty_file_is_not_locatable() {
        let file: FileData = serde_json::from_value(json!({ "path": "" })).unwrap();
        assert!(!file.is_locatable());
    }
}
