//! Classifier adapter: bytes in, canonical classification out.

use std::sync::Arc;

use ewaste_core::{ClassificationResult, LabelIndex, UNKNOWN_LABEL};
use image::imageops::FilterType;

use crate::classifier::{Classifier, ImageTensor};
use crate::result::ClassifyError;

const UNKNOWN_PRODUCT_NAME: &str = "Unknown item";

/// Fixed input resolution expected by the model.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InputSize {
    pub width: u32,
    pub height: u32,
}

impl InputSize {
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

impl Default for InputSize {
    fn default() -> Self {
        Self::square(224)
    }
}

#[derive(Clone)]
pub struct ClassifierAdapter {
    backend: Arc<dyn Classifier>,
    labels: Arc<LabelIndex>,
    input_size: InputSize,
}

impl ClassifierAdapter {
    pub fn new(backend: Arc<dyn Classifier>, labels: Arc<LabelIndex>) -> Self {
        Self {
            backend,
            labels,
            input_size: InputSize::default(),
        }
    }

    pub fn with_input_size(mut self, input_size: InputSize) -> Self {
        self.input_size = input_size;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn input_size(&self) -> InputSize {
        self.input_size
    }

    /// Decode, classify and map the top-1 index onto the label table.
    ///
    /// Blocks for the duration of decoding and inference.
    pub fn classify(&self, image_bytes: &[u8]) -> Result<ClassificationResult, ClassifyError> {
        let tensor = self.preprocess(image_bytes)?;
        let scores = self.backend.predict(&tensor)?;
        let (index, score) = top1(&scores)?;

        let (predicted_class, product_name) = match self.labels.get(index) {
            Some(label) => (label.canonical.clone(), label.display_name.clone()),
            None => {
                tracing::warn!(
                    index,
                    classes = self.labels.len(),
                    backend = self.backend.name(),
                    "classifier index outside label table"
                );
                (UNKNOWN_LABEL.to_string(), UNKNOWN_PRODUCT_NAME.to_string())
            }
        };

        tracing::debug!(
            predicted_class = %predicted_class,
            confidence = score,
            backend = self.backend.name(),
            "image classified"
        );

        Ok(ClassificationResult::new(
            predicted_class,
            product_name,
            f64::from(score),
        ))
    }

    /// Decode any supported raster format, convert to RGB, resize to the
    /// model's input size and scale channels to `[0, 1]`.
    pub fn preprocess(&self, image_bytes: &[u8]) -> Result<ImageTensor, ClassifyError> {
        let img = image::load_from_memory(image_bytes)
            .map_err(|e| ClassifyError::invalid_image(e.to_string()))?;

        let InputSize { width, height } = self.input_size;
        let rgb = img
            .resize_exact(width, height, FilterType::CatmullRom)
            .to_rgb8();

        let data = rgb
            .into_raw()
            .into_iter()
            .map(|channel| f32::from(channel) / 255.0)
            .collect();

        Ok(ImageTensor {
            width,
            height,
            data,
        })
    }
}

/// Index and value of the highest score; ties resolve to the lowest index.
fn top1(scores: &[f32]) -> Result<(usize, f32), ClassifyError> {
    if scores.is_empty() {
        return Err(ClassifyError::unavailable("classifier returned no scores"));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(ClassifyError::unavailable("classifier returned non-finite scores"));
    }

    let mut best = (0usize, scores[0]);
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > best.1 {
            best = (i, s);
        }
    }
    Ok(best)
}
