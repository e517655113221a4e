use crate::result::ClassifyError;

/// Normalized model input: one RGB image, NHWC layout, channels in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl ImageTensor {
    /// `[batch, height, width, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, 3]
    }
}

/// An image classification backend that can serve concurrent callers.
///
/// Returns one score per class index; the adapter picks the top-1 and maps it
/// onto labels.
pub trait Classifier: Send + Sync + 'static {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, ClassifyError>;
}

/// A backend whose runtime needs exclusive access per inference call.
///
/// Wrap it in [`crate::Exclusive`] to share it between request handlers.
pub trait StatefulClassifier: Send + 'static {
    fn name(&self) -> &str;

    fn predict(&mut self, input: &ImageTensor) -> Result<Vec<f32>, ClassifyError>;
}

/// Stand-in backend used when the model could not be loaded at startup.
///
/// Every call fails with [`ClassifyError::ClassifierUnavailable`], which keeps
/// the rest of the service (chat, health) running.
#[derive(Debug, Clone)]
pub struct UnavailableClassifier {
    reason: String,
}

impl UnavailableClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Classifier for UnavailableClassifier {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn predict(&self, _input: &ImageTensor) -> Result<Vec<f32>, ClassifyError> {
        Err(ClassifyError::unavailable(self.reason.clone()))
    }
}
