use std::sync::Arc;

use ewaste_chat::ChatResponder;
use ewaste_infra::{AnalysisOrchestrator, AppConfig, Assets};

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppServices {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub responder: Arc<ChatResponder>,
    pub max_upload_bytes: usize,
}

impl AppServices {
    pub fn new(assets: &Assets, config: &AppConfig) -> Self {
        Self {
            orchestrator: Arc::new(assets.orchestrator(config)),
            responder: Arc::new(ChatResponder::new(assets.kb.clone())),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
