use axum::{Router, routing::post};

pub mod analyze;
pub mod chat;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/analyze", post(analyze::analyze))
        .route("/chat", post(chat::chat))
}
