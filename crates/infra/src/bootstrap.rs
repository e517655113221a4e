//! Startup asset loading.
//!
//! Knowledge base and class index problems are fatal. A missing or broken
//! model is not: the classifier is replaced by [`UnavailableClassifier`] so
//! chat keeps working and `/analyze` reports `ClassifierUnavailable`.

use std::sync::Arc;

use ewaste_ai::{Classifier, ClassifierAdapter, InputSize, UnavailableClassifier};
use ewaste_core::{ConfigError, KnowledgeBase, LabelIndex};

use crate::analysis::AnalysisOrchestrator;
use crate::config::AppConfig;

/// Everything loaded once at process start and shared read-only afterwards.
#[derive(Clone)]
pub struct Assets {
    pub kb: Arc<KnowledgeBase>,
    pub labels: Arc<LabelIndex>,
    pub classifier: Arc<dyn Classifier>,
}

impl Assets {
    pub fn new(kb: KnowledgeBase, labels: LabelIndex, classifier: Arc<dyn Classifier>) -> Self {
        let labels = labels.with_display_names(&kb);
        let missing = labels.missing_records(&kb);
        if !missing.is_empty() {
            tracing::warn!(
                labels = ?missing,
                "class labels without disposal rules will use the unknown record"
            );
        }
        Self {
            kb: Arc::new(kb),
            labels: Arc::new(labels),
            classifier,
        }
    }

    pub fn orchestrator(&self, config: &AppConfig) -> AnalysisOrchestrator {
        let adapter = ClassifierAdapter::new(self.classifier.clone(), self.labels.clone())
            .with_input_size(InputSize::square(config.input_size));
        AnalysisOrchestrator::new(adapter, self.kb.clone())
            .with_confidence_threshold(config.confidence_threshold)
    }
}

pub fn load_assets(config: &AppConfig) -> Result<Assets, ConfigError> {
    let kb = KnowledgeBase::load(config.rules_path())?;
    let labels = LabelIndex::load(config.class_index_path())?;
    let classifier = load_classifier(config);
    Ok(Assets::new(kb, labels, classifier))
}

#[cfg(feature = "onnx")]
fn load_classifier(config: &AppConfig) -> Arc<dyn Classifier> {
    match ewaste_ai::OnnxClassifier::load(&config.model_path, InputSize::square(config.input_size)) {
        Ok(classifier) => Arc::new(classifier),
        Err(e) => {
            tracing::warn!(error = %e, "classifier not loaded; /analyze will report it unavailable");
            Arc::new(UnavailableClassifier::new(e.to_string()))
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn load_classifier(_config: &AppConfig) -> Arc<dyn Classifier> {
    tracing::warn!("built without the `onnx` feature; /analyze will report the classifier unavailable");
    Arc::new(UnavailableClassifier::new("no inference backend compiled in"))
}
