//! Application configuration
//!
//! Read once at startup from `<config_dir>/tryon-studio/config.json`.
//! Missing or broken files fall back to defaults. A few environment
//! variables override whatever the file says.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::SamplingParams;

/// Hugging Face Space hosting the try-on model
pub const DEFAULT_SPACE: &str = "levihsu/OOTDiffusion";

/// Gradio endpoint that runs the full-body try-on
pub const DEFAULT_API_NAME: &str = "/process_dc";

/// Edge length of the square previews are fitted into
pub const DEFAULT_PREVIEW_SIZE: u32 = 200;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Space id in `owner/name` form
    pub space: String,

    /// Explicit service root; wins over `space` when set
    pub service_url: Option<String>,

    /// Endpoint name, with its leading slash
    pub api_name: String,

    /// Access token for private or rate-limited Spaces
    pub hf_token: Option<String>,

    /// Per-request timeout. `None` waits as long as the model takes.
    pub request_timeout_secs: Option<u64>,

    /// Preview thumbnail size in pixels
    pub preview_size: u32,

    /// Sampling parameters sent with every request
    pub sampling: SamplingParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            space: DEFAULT_SPACE.to_string(),
            service_url: None,
            api_name: DEFAULT_API_NAME.to_string(),
            hf_token: None,
            request_timeout_secs: None,
            preview_size: DEFAULT_PREVIEW_SIZE,
            sampling: SamplingParams::default(),
        }
    }
}

impl Config {
    /// Returns the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tryon-studio").join("config.json"))
    }

    /// Loads configuration from the default location plus environment overrides.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("Could not determine config directory");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Loads configuration from a specific file, or returns defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(?path, "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply `TRYON_SPACE`, `TRYON_SERVICE_URL` and `HF_TOKEN`.
    ///
    /// The lookup is injected so tests don't touch the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(space) = non_empty("TRYON_SPACE") {
            self.space = space;
        }
        if let Some(url) = non_empty("TRYON_SERVICE_URL") {
            self.service_url = Some(url);
        }
        if let Some(token) = non_empty("HF_TOKEN") {
            self.hf_token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_json_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ this is not json").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "service_url": "http://127.0.0.1:7860", "sampling": { "n_steps": 30 } }"#,
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.service_url.as_deref(), Some("http://127.0.0.1:7860"));
        assert_eq!(config.sampling.n_steps, 30);
        assert_eq!(config.sampling.n_samples, 1);
        assert_eq!(config.space, DEFAULT_SPACE);
        assert_eq!(config.api_name, DEFAULT_API_NAME);
        assert_eq!(config.preview_size, DEFAULT_PREVIEW_SIZE);
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("TRYON_SPACE", "someone/other-model"),
            ("HF_TOKEN", "hf_secret"),
            ("TRYON_SERVICE_URL", "   "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.space, "someone/other-model");
        assert_eq!(config.hf_token.as_deref(), Some("hf_secret"));
        // blank values are ignored
        assert_eq!(config.service_url, None);
    }
}
