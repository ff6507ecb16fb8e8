//! Garment categories understood by the try-on model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the body the garment covers
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    #[serde(rename = "Upper-body")]
    UpperBody,
    #[serde(rename = "Lower-body")]
    LowerBody,
    #[serde(rename = "Dress")]
    Dress,
}

impl Category {
    /// Every category, in the order the pick list shows them
    pub const ALL: [Category; 3] = [Category::UpperBody, Category::LowerBody, Category::Dress];

    /// The exact string the remote endpoint expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::UpperBody => "Upper-body",
            Category::LowerBody => "Lower-body",
            Category::Dress => "Dress",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
