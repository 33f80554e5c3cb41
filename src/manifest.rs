//! Class-order configuration that travels with a model artifact.
//!
//! The index-to-label mapping is fixed by whoever trained the model, so it is
//! versioned and loaded next to the artifact instead of living in code.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelLoadError;

pub const DEFAULT_VERSION: &str = "trash-classifier-v1";
pub const DEFAULT_CLASSES: [&str; 4] = ["Hazardous", "Organic", "Other", "Recyclable"];
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Pixel channel order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Source RGB channel feeding each tensor channel.
    pub fn source_channels(self) -> [usize; 3] {
        match self {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        }
    }
}

/// What the final model layer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Probabilities,
    Logits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub version: String,
    pub classes: Vec<String>,
    pub input_size: u32,
    pub channel_order: ChannelOrder,
    pub output: OutputKind,
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest {
            version: DEFAULT_VERSION.to_string(),
            classes: DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect(),
            input_size: DEFAULT_INPUT_SIZE,
            // the model was trained on OpenCV-decoded frames
            channel_order: ChannelOrder::Bgr,
            output: OutputKind::Probabilities,
        }
    }
}

impl Manifest {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ModelLoadError::ManifestIo {
            path: display.clone(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&raw).map_err(|source| ModelLoadError::ManifestFormat {
                path: display,
                source,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.classes.is_empty() {
            return Err(ModelLoadError::NoClasses(self.version.clone()));
        }
        if self.input_size == 0 {
            return Err(ModelLoadError::InputSize);
        }
        Ok(())
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}
