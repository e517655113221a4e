//! `ewaste-core`: disposal knowledge and shared value types.
//!
//! This crate is **pure**: no HTTP, no inference runtime. It owns the disposal
//! knowledge base, the classifier label table, geolocation and the maps link
//! builder, plus the configuration error model used when loading them.

pub mod classification;
pub mod error;
pub mod geo;
pub mod knowledge;
pub mod labels;
pub mod maps;
pub mod record;

pub use classification::ClassificationResult;
pub use error::{ConfigError, ConfigResult};
pub use geo::GeoPoint;
pub use knowledge::KnowledgeBase;
pub use labels::{ClassLabel, LabelIndex};
pub use maps::build_link;
pub use record::{DisposalRecord, UNKNOWN_LABEL, canonical_label};
