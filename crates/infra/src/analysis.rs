//! Analysis pipeline (application-level orchestration).
//!
//! ```text
//! image bytes (+ optional GeoPoint)
//!   ↓
//! 1. Reject empty payloads (MissingImage)
//!   ↓
//! 2. Classify via the adapter (InvalidImage / ClassifierUnavailable)
//!   ↓
//! 3. Apply the confidence threshold
//!   ↓
//! 4. Join against the disposal knowledge base (unknown record on a miss)
//!   ↓
//! 5. Build the recycling-centre link
//!   ↓
//! AnalysisResponse
//! ```
//!
//! Synchronous and blocking: callers on an async runtime run it on a blocking
//! thread. No retries and no partial responses.

use std::sync::Arc;

use ewaste_ai::{ClassifierAdapter, ClassifyError};
use ewaste_core::{
    ClassificationResult, DisposalRecord, GeoPoint, KnowledgeBase, UNKNOWN_LABEL, build_link,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::DEFAULT_CONFIDENCE_THRESHOLD;

/// Product name reported when the classifier is not confident enough.
pub const UNCERTAIN_PRODUCT_NAME: &str = "Uncertain item";

/// Wire contract of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub predicted_class: String,
    pub product_name: String,
    pub confidence: f64,
    pub category: String,
    pub disposal_steps: Vec<String>,
    pub hazards: String,
    pub tips: String,
    pub nearest_recycling_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no image uploaded")]
    MissingImage,

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}

impl AnalysisError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MissingImage => "missing_image",
            AnalysisError::InvalidImage(_) => "invalid_image",
            AnalysisError::ClassifierUnavailable(_) => "classifier_unavailable",
        }
    }
}

impl From<ClassifyError> for AnalysisError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::InvalidImage(msg) => AnalysisError::InvalidImage(msg),
            ClassifyError::ClassifierUnavailable(msg) => AnalysisError::ClassifierUnavailable(msg),
        }
    }
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    adapter: ClassifierAdapter,
    kb: Arc<KnowledgeBase>,
    confidence_threshold: f64,
}

impl AnalysisOrchestrator {
    pub fn new(adapter: ClassifierAdapter, kb: Arc<KnowledgeBase>) -> Self {
        Self {
            adapter,
            kb,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn analyze(
        &self,
        image_bytes: &[u8],
        point: Option<GeoPoint>,
    ) -> Result<AnalysisResponse, AnalysisError> {
        if image_bytes.is_empty() {
            return Err(AnalysisError::MissingImage);
        }

        let classification = self.adapter.classify(image_bytes)?;
        Ok(self.assemble(classification, point))
    }

    /// Join a classification with disposal guidance and a recycling link.
    pub fn assemble(
        &self,
        classification: ClassificationResult,
        point: Option<GeoPoint>,
    ) -> AnalysisResponse {
        let ClassificationResult {
            predicted_class,
            product_name,
            confidence,
        } = classification;

        let uncertain =
            confidence < self.confidence_threshold || predicted_class == UNKNOWN_LABEL;

        let (product_name, record): (String, &DisposalRecord) = if uncertain {
            tracing::info!(
                predicted_class = %predicted_class,
                confidence,
                threshold = self.confidence_threshold,
                "low-confidence classification; returning generic guidance"
            );
            (UNCERTAIN_PRODUCT_NAME.to_string(), self.kb.unknown())
        } else {
            (product_name, self.kb.lookup(&predicted_class))
        };

        // Uncertain items search for any e-waste centre rather than "Uncertain item".
        let query = if uncertain { "" } else { product_name.as_str() };
        let nearest_recycling_link = build_link(point, query);

        AnalysisResponse {
            predicted_class,
            confidence,
            category: record.category.clone(),
            disposal_steps: record.disposal_steps.clone(),
            hazards: record.hazards.clone(),
            tips: record.tips.clone(),
            nearest_recycling_link,
            product_name,
        }
    }
}
