use std::path::Path;

use anyhow::Context;
use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::ModelLoadError;

/// Read-only forward pass over a batched NHWC tensor.
///
/// Implementations are shared across request workers and must never mutate
/// themselves after construction.
pub trait Model: Send + Sync {
    fn forward(&self, input: Array4<f32>) -> anyhow::Result<Vec<f32>>;
}

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// ONNX artifact executed with tract.
pub struct OnnxModel {
    plan: Plan,
}

impl OnnxModel {
    pub fn load<P: AsRef<Path>>(path: P, input_size: u32) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let size = input_size as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, size, size, 3]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ModelLoadError::Model {
                path: path.display().to_string(),
                message: format!("{e:#}"),
            })?;

        Ok(OnnxModel { plan })
    }
}

impl Model for OnnxModel {
    fn forward(&self, input: Array4<f32>) -> anyhow::Result<Vec<f32>> {
        let tensor = Tensor::from(input);
        let outputs = self.plan.run(tvec!(tensor.into()))?;
        let output = outputs.first().context("model returned no outputs")?;
        let view = output.to_array_view::<f32>()?;
        Ok(view.iter().copied().collect())
    }
}
