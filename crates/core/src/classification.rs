use serde::{Deserialize, Serialize};

/// Top-1 output of the image classifier, mapped onto the canonical label space.
///
/// Produced once per analysis request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Canonical lowercase label (e.g. `"battery"`).
    pub predicted_class: String,

    /// Display name for the label (e.g. `"Battery"`).
    pub product_name: String,

    /// Top-1 probability reported by the classifier, passed through as-is.
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn new(
        predicted_class: impl Into<String>,
        product_name: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            predicted_class: predicted_class.into(),
            product_name: product_name.into(),
            confidence,
        }
    }
}
