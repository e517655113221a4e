use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Multipart, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use ewaste_core::GeoPoint;
use ewaste_infra::AnalysisError;

use crate::app::errors::{analysis_error_to_response, json_error};
use crate::app::services::AppServices;

/// Fields of the `multipart/form-data` upload.
#[derive(Debug, Default)]
struct AnalyzeForm {
    image: Option<Bytes>,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl AnalyzeForm {
    fn point(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.lat, self.lng)
    }
}

pub async fn analyze(
    Extension(services): Extension<Arc<AppServices>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = Uuid::now_v7();
    let span = tracing::info_span!("analyze", %request_id);

    async move {
        // Not a multipart body at all: nothing was uploaded.
        let Ok(multipart) = multipart else {
            return analysis_error_to_response(AnalysisError::MissingImage);
        };

        let form = match read_form(multipart).await {
            Ok(form) => form,
            Err(resp) => return resp,
        };

        let point = form.point();
        let Some(image) = form.image else {
            return analysis_error_to_response(AnalysisError::MissingImage);
        };

        tracing::info!(bytes = image.len(), located = point.is_some(), "analysis requested");

        let orchestrator = services.orchestrator.clone();
        let outcome =
            tokio::task::spawn_blocking(move || orchestrator.analyze(&image, point)).await;

        match outcome {
            Ok(Ok(resp)) => {
                tracing::info!(
                    predicted_class = %resp.predicted_class,
                    confidence = resp.confidence,
                    "analysis complete"
                );
                (StatusCode::OK, Json(resp)).into_response()
            }
            Ok(Err(err)) => {
                tracing::warn!(kind = err.kind(), error = %err, "analysis rejected");
                analysis_error_to_response(err)
            }
            Err(join) => {
                tracing::error!(error = %join, "analysis task failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "analysis failed",
                )
            }
        }
    }
    .instrument(span)
    .await
}

/// Unknown fields are skipped. Coordinates that do not parse are treated as
/// absent rather than rejected.
async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, Response> {
    let mut form = AnalyzeForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(json_error(e.status(), "invalid_multipart", e.body_text())),
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| json_error(e.status(), "invalid_multipart", e.body_text()))?;
                form.image = Some(bytes);
            }
            "lat" | "lng" => {
                let value = field
                    .text()
                    .await
                    .ok()
                    .and_then(|raw| raw.trim().parse::<f64>().ok());
                if name == "lat" {
                    form.lat = value;
                } else {
                    form.lng = value;
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
