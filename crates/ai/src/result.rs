use thiserror::Error;

/// Why an image could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The payload is not a decodable raster image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The inference backend failed to load or execute.
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}

impl ClassifyError {
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ClassifierUnavailable(msg.into())
    }
}
