use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app::dto::{ChatRequest, ChatResponse};
use crate::app::errors::json_error;
use crate::app::services::AppServices;

pub async fn chat(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text());
        }
    };

    let message = req.message.trim();
    if message.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "empty_message", "Empty message");
    }

    let reply = services.responder.reply(message, &req.context());
    tracing::info!(
        intent = reply.intent.as_str(),
        has_context = reply.has_context,
        "chat reply"
    );

    Json(ChatResponse { reply: reply.text }).into_response()
}
