//! The user's current picks
//! 
//! Two file paths and a category. Nothing here survives a restart.

use std::path::{Path, PathBuf};

use super::{Category, SamplingParams};
use crate::error::{Error, Result};

/// One of the two input image slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Person,
    Garment,
}

impl Slot {
    /// Label shown before anything is picked
    pub fn prompt(&self) -> &'static str {
        match self {
            Slot::Person => "Upload Person Image",
            Slot::Garment => "Upload Garment Image",
        }
    }

    /// Text of the button that opens the file dialog
    pub fn button_label(&self) -> &'static str {
        match self {
            Slot::Person => "Choose Person Image",
            Slot::Garment => "Choose Garment Image",
        }
    }
}

/// Everything needed to issue one try-on call
#[derive(Debug, Clone, PartialEq)]
pub struct TryOnRequest {
    pub person: PathBuf,
    pub garment: PathBuf,
    pub category: Category,
    pub params: SamplingParams,
}

/// Paths and category chosen in the window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub person: Option<PathBuf>,
    pub garment: Option<PathBuf>,
    pub category: Category,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path currently stored in a slot
    pub fn get(&self, slot: Slot) -> Option<&Path> {
        match slot {
            Slot::Person => self.person.as_deref(),
            Slot::Garment => self.garment.as_deref(),
        }
    }

    /// Store a freshly picked path
    pub fn set(&mut self, slot: Slot, path: PathBuf) {
        match slot {
            Slot::Person => self.person = Some(path),
            Slot::Garment => self.garment = Some(path),
        }
    }

    /// "Selected: <name>" once a slot holds a file, the prompt otherwise
    pub fn label(&self, slot: Slot) -> String {
        match self.get(slot) {
            Some(path) => {
                let name = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy();
                format!("Selected: {}", name)
            }
            None => slot.prompt().to_string(),
        }
    }

    /// True only when both paths are set and both files exist
    pub fn is_ready(&self) -> bool {
        match (&self.person, &self.garment) {
            (Some(person), Some(garment)) => person.exists() && garment.exists(),
            _ => false,
        }
    }

    /// Validate the selection right before submitting
    pub fn request(&self, params: SamplingParams) -> Result<TryOnRequest> {
        let (Some(person), Some(garment)) = (&self.person, &self.garment) else {
            return Err(Error::NotReady);
        };

        for path in [person, garment] {
            if !path.exists() {
                return Err(Error::MissingFile(path.clone()));
            }
        }

        Ok(TryOnRequest {
            person: person.clone(),
            garment: garment.clone(),
            category: self.category,
            params,
        })
    }
}
