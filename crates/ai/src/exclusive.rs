use std::sync::Mutex;

use crate::classifier::{Classifier, ImageTensor, StatefulClassifier};
use crate::result::ClassifyError;

/// Single-slot guard that serializes inference on a [`StatefulClassifier`].
///
/// Concurrent callers queue on the mutex; at most one `predict` runs at a time.
pub struct Exclusive<C> {
    name: String,
    inner: Mutex<C>,
}

impl<C: StatefulClassifier> Exclusive<C> {
    pub fn new(inner: C) -> Self {
        Self {
            name: inner.name().to_string(),
            inner: Mutex::new(inner),
        }
    }
}

impl<C: StatefulClassifier> Classifier for Exclusive<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, ClassifyError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ClassifyError::unavailable("classifier lock poisoned by an earlier failure"))?;
        guard.predict(input)
    }
}
