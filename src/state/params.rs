//! Sampling parameters for the remote diffusion model
//! 
//! These are fixed per run and sent alongside both images.
//! They can be overridden from the config file, and are serialized
//! with serde for that purpose.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Knobs forwarded verbatim to the try-on endpoint
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SamplingParams {
    /// Number of images to generate
    pub n_samples: u32,

    /// Diffusion steps
    /// - More steps = slower but cleaner output
    pub n_steps: u32,

    /// Guidance scale
    pub image_scale: f32,

    /// Random seed
    /// - -1 lets the service pick one
    pub seed: i64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            n_samples: 1,
            n_steps: 20,
            image_scale: 2.0,
            seed: -1,
        }
    }
}

impl SamplingParams {
    /// Check if the service should choose the seed
    pub fn is_random_seed(&self) -> bool {
        self.seed < 0
    }

    /// The trailing positional inputs of the endpoint, in order
    pub fn to_inputs(&self) -> [Value; 4] {
        [
            json!(self.n_samples),
            json!(self.n_steps),
            json!(self.image_scale),
            json!(self.seed),
        ]
    }
}
