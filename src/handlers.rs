use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::{info, warn};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::error::ApiError;
use crate::models::HealthResponse;
use crate::upload::{SpoolConfig, Upload};

/// Multipart part carrying the image.
pub const FILE_FIELD: &str = "file";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/health").route(web::get().to(health)));
}

pub async fn predict(
    classifier: web::Data<Classifier>,
    spool: web::Data<SpoolConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let mut upload: Option<Upload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::Payload(e.to_string()))?;
        let wanted =
            upload.is_none() && field.content_disposition().get_name() == Some(FILE_FIELD);

        if !wanted {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ApiError::Payload(e.to_string()))?;
            }
            continue;
        }

        let mut stored = Upload::new(**spool);
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| ApiError::Payload(e.to_string()))?;
            stored = web::block(move || stored.write(&data).map(|_| stored))
                .await
                .map_err(|_| ApiError::Blocking)??;
        }
        upload = Some(stored);
    }

    let upload = match upload {
        Some(upload) if !upload.is_empty() => upload,
        _ => {
            warn!("[{}] request carried no image", request_id);
            return Err(ApiError::MissingFile);
        }
    };
    info!(
        "[{}] received {} bytes ({})",
        request_id,
        upload.len(),
        if upload.on_disk() { "spooled" } else { "in memory" }
    );

    let worker = classifier.clone();
    let outcome = web::block(move || -> Result<_, ApiError> {
        let reader = upload.into_reader()?;
        Ok(worker.classify_reader(reader)?)
    })
    .await
    .map_err(|_| ApiError::Blocking)?;

    match outcome {
        Ok(prediction) => {
            info!(
                "[{}] {} ({:.4})",
                request_id, prediction.label, prediction.confidence
            );
            Ok(HttpResponse::Ok().json(prediction))
        }
        Err(e) => {
            warn!("[{}] classification failed: {}", request_id, e);
            Err(e)
        }
    }
}

pub async fn health(classifier: web::Data<Classifier>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: classifier.manifest().version.clone(),
    })
}
