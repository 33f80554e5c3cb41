use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorBody;

/// Failure of a single classification call.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("invalid image: {0}")]
    Decode(String),
    #[error("degenerate image: {width}x{height}")]
    Shape { width: u32, height: u32 },
    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<image::ImageError> for ClassifyError {
    fn from(err: image::ImageError) -> Self {
        ClassifyError::Decode(err.to_string())
    }
}

/// Failure while bringing the classifier up. Always fatal.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("failed to read manifest {path}: {source}")]
    ManifestIo {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    ManifestFormat {
        path: String,
        source: serde_json::Error,
    },
    #[error("manifest {0} lists no classes")]
    NoClasses(String),
    #[error("manifest input size must be positive")]
    InputSize,
    #[error("failed to load model {path}: {message}")]
    Model { path: String, message: String },
    #[error("probe inference failed: {0}")]
    Probe(String),
    #[error("model produced {actual} outputs but manifest {version} lists {expected} classes")]
    ClassCount {
        version: String,
        expected: usize,
        actual: usize,
    },
}

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Image file is required")]
    MissingFile,
    #[error("Malformed upload: {0}")]
    Payload(String),
    #[error("Could not store upload")]
    Storage(#[from] std::io::Error),
    #[error("Worker pool unavailable")]
    Blocking,
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::Payload(_) => StatusCode::BAD_REQUEST,
            ApiError::Classify(ClassifyError::Decode(_))
            | ApiError::Classify(ClassifyError::Shape { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Classify(ClassifyError::Inference(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Storage(_) | ApiError::Blocking => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
