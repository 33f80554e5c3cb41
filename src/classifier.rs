use std::io::{BufRead, Seek};
use std::path::Path;

use image::DynamicImage;
use log::debug;
use ndarray::Array4;

use crate::error::{ClassifyError, ModelLoadError};
use crate::manifest::{Manifest, OutputKind};
use crate::model::{Model, OnnxModel};
use crate::models::{Prediction, Probabilities};
use crate::preprocess;

/// Image classifier built once at start-up and shared read-only afterwards.
pub struct Classifier {
    model: Box<dyn Model>,
    manifest: Manifest,
}

impl Classifier {
    /// Wraps a model and checks, with one forward pass over a blank input,
    /// that it emits exactly one score per manifest class.
    pub fn new(model: Box<dyn Model>, manifest: Manifest) -> Result<Self, ModelLoadError> {
        manifest.validate()?;

        let size = manifest.input_size as usize;
        let outputs = model
            .forward(Array4::zeros((1, size, size, 3)))
            .map_err(|e| ModelLoadError::Probe(format!("{e:#}")))?;
        if outputs.len() != manifest.classes.len() {
            return Err(ModelLoadError::ClassCount {
                version: manifest.version.clone(),
                expected: manifest.classes.len(),
                actual: outputs.len(),
            });
        }

        Ok(Classifier { model, manifest })
    }

    /// Loads an ONNX artifact sized for `manifest`.
    pub fn load<P: AsRef<Path>>(path: P, manifest: Manifest) -> Result<Self, ModelLoadError> {
        // reject a bad manifest before paying for the ONNX parse
        manifest.validate()?;
        let model = OnnxModel::load(path, manifest.input_size)?;
        Classifier::new(Box::new(model), manifest)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn classify(&self, bytes: &[u8]) -> Result<Prediction, ClassifyError> {
        let image = preprocess::decode_bytes(bytes)?;
        self.classify_image(&image)
    }

    pub fn classify_reader<R: BufRead + Seek>(
        &self,
        reader: R,
    ) -> Result<Prediction, ClassifyError> {
        let image = preprocess::decode(reader)?;
        self.classify_image(&image)
    }

    pub fn probabilities(&self, bytes: &[u8]) -> Result<Probabilities, ClassifyError> {
        let image = preprocess::decode_bytes(bytes)?;
        self.probabilities_of(&image)
    }

    pub fn classify_image(&self, image: &DynamicImage) -> Result<Prediction, ClassifyError> {
        let probabilities = self.probabilities_of(image)?;
        let (index, confidence) = probabilities
            .argmax()
            .ok_or_else(|| ClassifyError::Inference("model returned no scores".to_string()))?;
        let label = self
            .manifest
            .label(index)
            .ok_or_else(|| ClassifyError::Inference(format!("no class at index {index}")))?;

        debug!("scores {:?} -> {}", probabilities.scores, label);
        Ok(Prediction {
            label: label.to_string(),
            confidence,
        })
    }

    fn probabilities_of(&self, image: &DynamicImage) -> Result<Probabilities, ClassifyError> {
        preprocess::ensure_dimensions(image)?;
        let tensor = preprocess::to_tensor(image, &self.manifest);
        let raw = self
            .model
            .forward(tensor)
            .map_err(|e| ClassifyError::Inference(format!("{e:#}")))?;

        if raw.len() != self.manifest.classes.len() {
            return Err(ClassifyError::Inference(format!(
                "expected {} scores, got {}",
                self.manifest.classes.len(),
                raw.len()
            )));
        }
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(ClassifyError::Inference(
                "model returned non-finite scores".to_string(),
            ));
        }

        let scores = match self.manifest.output {
            OutputKind::Probabilities => raw,
            OutputKind::Logits => softmax(&raw),
        };
        Ok(Probabilities { scores })
    }
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / total).collect()
}
