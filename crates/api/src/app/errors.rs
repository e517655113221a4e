use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ewaste_infra::AnalysisError;

pub fn analysis_error_to_response(err: AnalysisError) -> axum::response::Response {
    let status = match err {
        AnalysisError::MissingImage => StatusCode::BAD_REQUEST,
        AnalysisError::InvalidImage(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::ClassifierUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    json_error(status, err.kind(), err.to_string())
}

/// `{"error": <message>, "kind": <machine-readable kind>}`
pub fn json_error(
    status: StatusCode,
    kind: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "kind": kind,
        })),
    )
        .into_response()
}
