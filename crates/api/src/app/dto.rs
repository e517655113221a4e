use serde::{Deserialize, Serialize};

use ewaste_chat::ChatContext;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub last_class: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl ChatRequest {
    pub fn context(&self) -> ChatContext {
        ChatContext::new(self.last_class.clone(), self.last_name.clone())
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}
