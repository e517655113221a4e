//! Classifier label index table.
//!
//! Maps the classifier's raw output index to a canonical label and a display
//! name. The file format is the one emitted by the training script:
//! `{ "0": "battery", "1": "keyboard" }`, optionally with per-entry objects
//! `{ "0": { "label": "battery", "display_name": "Battery" } }`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult, read_file};
use crate::knowledge::KnowledgeBase;
use crate::record::canonical_label;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Plain(String),
    Detailed {
        label: String,
        #[serde(default)]
        display_name: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabel {
    pub canonical: String,
    pub display_name: String,
    explicit_name: bool,
}

impl ClassLabel {
    fn new(raw: &str, display_name: Option<String>) -> Self {
        let canonical = canonical_label(raw);
        match display_name.filter(|n| !n.trim().is_empty()) {
            Some(name) => Self {
                canonical,
                display_name: name.trim().to_string(),
                explicit_name: true,
            },
            None => Self {
                display_name: title_case(&canonical),
                canonical,
                explicit_name: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelIndex {
    labels: Vec<ClassLabel>,
}

impl LabelIndex {
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let index = Self::from_json(&read_file(path)?)?;
        tracing::info!(path = %path.display(), classes = index.len(), "loaded class index table");
        Ok(index)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let raw: BTreeMap<String, RawLabel> =
            serde_json::from_str(json).map_err(|e| ConfigError::parse("class index table", e))?;

        let mut by_index: BTreeMap<usize, ClassLabel> = BTreeMap::new();
        for (key, value) in raw {
            let idx: usize = key.trim().parse().map_err(|_| {
                ConfigError::invalid("class index table", format!("key '{key}' is not a class index"))
            })?;
            let label = match value {
                RawLabel::Plain(label) => ClassLabel::new(&label, None),
                RawLabel::Detailed { label, display_name } => ClassLabel::new(&label, display_name),
            };
            if by_index.insert(idx, label).is_some() {
                return Err(ConfigError::invalid(
                    "class index table",
                    format!("index {idx} is defined more than once"),
                ));
            }
        }

        // Every index in 0..n must map to a label.
        for (pos, idx) in by_index.keys().enumerate() {
            if pos != *idx {
                return Err(ConfigError::invalid(
                    "class index table",
                    format!("index {pos} is missing; indexes must be contiguous from 0"),
                ));
            }
        }

        Self::validated(by_index.into_values().collect())
    }

    /// Build from labels listed in index order.
    pub fn from_labels<I, S>(labels: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::validated(
            labels
                .into_iter()
                .map(|l| ClassLabel::new(l.as_ref(), None))
                .collect(),
        )
    }

    fn validated(labels: Vec<ClassLabel>) -> ConfigResult<Self> {
        if labels.is_empty() {
            return Err(ConfigError::invalid("class index table", "no classes defined"));
        }
        let mut seen = HashSet::new();
        for (idx, label) in labels.iter().enumerate() {
            if label.canonical.is_empty() {
                return Err(ConfigError::invalid(
                    "class index table",
                    format!("index {idx} has an empty label"),
                ));
            }
            if !seen.insert(label.canonical.as_str()) {
                return Err(ConfigError::invalid(
                    "class index table",
                    format!("label '{}' appears more than once", label.canonical),
                ));
            }
        }
        Ok(Self { labels })
    }

    /// Fill in display names from the knowledge base for labels that did not
    /// declare one of their own.
    pub fn with_display_names(mut self, kb: &KnowledgeBase) -> Self {
        for label in self.labels.iter_mut().filter(|l| !l.explicit_name) {
            if let Some(name) = kb.display_name(&label.canonical) {
                label.display_name = name.to_string();
            }
        }
        self
    }

    /// Labels the knowledge base has no entry for (they fall back to the
    /// unknown record at lookup time).
    pub fn missing_records<'a>(&'a self, kb: &KnowledgeBase) -> Vec<&'a str> {
        self.labels
            .iter()
            .filter(|l| !kb.contains(&l.canonical))
            .map(|l| l.canonical.as_str())
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&ClassLabel> {
        self.labels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassLabel> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn title_case(canonical: &str) -> String {
    canonical
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
