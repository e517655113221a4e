//! Infrastructure layer: process configuration, asset loading and the
//! analysis pipeline that composes classifier, knowledge base and maps links.

pub mod analysis;
pub mod bootstrap;
pub mod config;

pub use analysis::{AnalysisError, AnalysisOrchestrator, AnalysisResponse};
pub use bootstrap::{Assets, load_assets};
pub use config::AppConfig;
