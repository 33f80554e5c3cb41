//! Single-endpoint image classifier for sorting trash photos into
//! Hazardous, Organic, Other and Recyclable.

pub mod classifier;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod manifest;
pub mod model;
pub mod models;
pub mod preprocess;
pub mod upload;

#[cfg(test)]
mod testing;

pub use classifier::Classifier;
pub use error::{ClassifyError, ModelLoadError};
pub use manifest::Manifest;
pub use models::Prediction;
