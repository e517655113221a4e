//! `ewaste-ai`
//!
//! **Responsibility:** image classification boundary.
//!
//! - The [`ClassifierAdapter`] is the only place that knows about image
//!   decoding and the model's fixed input shape.
//! - Backends implement [`Classifier`] and only see normalized tensors.
//! - Nothing here knows about disposal rules or HTTP.

pub mod adapter;
pub mod classifier;
pub mod exclusive;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod result;

pub use adapter::{ClassifierAdapter, InputSize};
pub use classifier::{Classifier, ImageTensor, StatefulClassifier, UnavailableClassifier};
pub use exclusive::Exclusive;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use result::ClassifyError;
