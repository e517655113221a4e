//! ONNX backend (tract).

use std::path::Path;

use tract_onnx::prelude::*;

use crate::adapter::InputSize;
use crate::classifier::{Classifier, ImageTensor};
use crate::result::ClassifyError;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Image classifier backed by an ONNX model with an NHWC `f32` input and a
/// single probability vector output.
///
/// The optimized plan is immutable; each `run` builds its own state, so the
/// backend is shared between handlers without a lock.
pub struct OnnxClassifier {
    plan: Plan,
    input_size: InputSize,
}

impl OnnxClassifier {
    pub fn load(path: impl AsRef<Path>, input_size: InputSize) -> Result<Self, ClassifyError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClassifyError::unavailable(format!(
                "model file not found at {}",
                path.display()
            )));
        }

        let shape = [1, input_size.height as usize, input_size.width as usize, 3];
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact(shape).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| {
                ClassifyError::unavailable(format!("failed to load model {}: {e}", path.display()))
            })?;

        tracing::info!(
            path = %path.display(),
            width = input_size.width,
            height = input_size.height,
            "loaded onnx classifier"
        );
        Ok(Self { plan, input_size })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, ClassifyError> {
        if input.width != self.input_size.width || input.height != self.input_size.height {
            return Err(ClassifyError::unavailable(format!(
                "model expects {}x{} input, got {}x{}",
                self.input_size.width, self.input_size.height, input.width, input.height
            )));
        }

        let [n, h, w, c] = input.shape();
        let tensor: Tensor = tract_ndarray::Array4::from_shape_vec((n, h, w, c), input.data.clone())
            .map_err(|e| ClassifyError::unavailable(format!("failed to shape input tensor: {e}")))?
            .into();

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| ClassifyError::unavailable(format!("inference failed: {e}")))?;

        let first = outputs
            .first()
            .ok_or_else(|| ClassifyError::unavailable("model produced no outputs"))?;
        let scores = first
            .to_array_view::<f32>()
            .map_err(|e| ClassifyError::unavailable(format!("output is not f32: {e}")))?;

        Ok(scores.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_file_is_unavailable() {
        let err = OnnxClassifier::load("/no/such/model.onnx", InputSize::default())
            .err()
            .unwrap();
        match err {
            ClassifyError::ClassifierUnavailable(msg) => assert!(msg.contains("not found")),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }
}
