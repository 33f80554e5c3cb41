use std::path::PathBuf;

use clap::{Args, Parser};
use log::info;

use crate::classifier::Classifier;
use crate::error::ModelLoadError;
use crate::manifest::Manifest;
use crate::upload::{SpoolConfig, DEFAULT_SPOOL_THRESHOLD};

/// Model artifact and the class manifest that goes with it.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// ONNX model file
    #[arg(
        long,
        env = "TRASH_CLASSIFIER_MODEL",
        default_value = "trash_classifier.onnx",
        value_name = "FILE"
    )]
    pub model: PathBuf,

    /// JSON manifest with the class order; built-in order when omitted
    #[arg(long, env = "TRASH_CLASSIFIER_MANIFEST", value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

impl ModelArgs {
    pub fn manifest(&self) -> Result<Manifest, ModelLoadError> {
        match &self.manifest {
            Some(path) => Manifest::from_path(path),
            None => Ok(Manifest::default()),
        }
    }

    pub fn load(&self) -> Result<Classifier, ModelLoadError> {
        let manifest = self.manifest()?;
        info!(
            "loading {} with manifest {} ({})",
            self.model.display(),
            manifest.version,
            manifest.classes.join(", ")
        );
        Classifier::load(&self.model, manifest)
    }
}

/// Trash image classification service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[arg(long, env = "TRASH_CLASSIFIER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "TRASH_CLASSIFIER_PORT", default_value_t = 8000)]
    pub port: u16,

    /// HTTP worker threads; one per core when omitted
    #[arg(long, env = "TRASH_CLASSIFIER_WORKERS")]
    pub workers: Option<usize>,

    /// Upload bytes held in memory before spilling to a temporary file
    #[arg(
        long,
        env = "TRASH_CLASSIFIER_SPOOL_THRESHOLD",
        default_value_t = DEFAULT_SPOOL_THRESHOLD,
        value_name = "BYTES"
    )]
    pub spool_threshold: usize,
}

impl ServeArgs {
    pub fn spool(&self) -> SpoolConfig {
        SpoolConfig {
            threshold: self.spool_threshold,
        }
    }
}

/// Classify a single image file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Print the service's JSON response instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Image to classify
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,
}
