//! Disposal knowledge base.
//!
//! Loaded once at startup from a JSON object keyed by class label and shared
//! read-only afterwards. Lookups are total: unknown labels resolve to the
//! designated unknown record.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult, read_file};
use crate::record::{DisposalRecord, UNKNOWN_LABEL, canonical_label};

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    records: HashMap<String, DisposalRecord>,
    unknown: DisposalRecord,
}

impl KnowledgeBase {
    /// Load and validate a knowledge base file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let kb = Self::from_json(&read_file(path)?)?;
        tracing::info!(
            path = %path.display(),
            entries = kb.len(),
            "loaded disposal knowledge base"
        );
        Ok(kb)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let raw: BTreeMap<String, DisposalRecord> =
            serde_json::from_str(json).map_err(|e| ConfigError::parse("disposal rules", e))?;
        Self::from_records(raw)
    }

    /// Build from `(label, record)` pairs.
    ///
    /// Labels are canonicalized; an `"unknown"` entry replaces the built-in
    /// unknown record instead of being stored as a regular class.
    pub fn from_records<I, S>(entries: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (S, DisposalRecord)>,
        S: AsRef<str>,
    {
        let mut records = HashMap::new();
        let mut unknown = DisposalRecord::unknown();

        for (raw_label, record) in entries {
            let label = canonical_label(raw_label.as_ref());
            if label.is_empty() {
                return Err(ConfigError::invalid("disposal rules", "entry with an empty label"));
            }
            record.validate(&label)?;

            if label == UNKNOWN_LABEL {
                unknown = record;
                continue;
            }
            if records.insert(label.clone(), record).is_some() {
                return Err(ConfigError::invalid(
                    "disposal rules",
                    format!("label '{label}' is defined more than once"),
                ));
            }
        }

        Ok(Self { records, unknown })
    }

    /// Record for `label`, or the unknown record when there is none.
    pub fn lookup(&self, label: &str) -> &DisposalRecord {
        self.get(label).unwrap_or(&self.unknown)
    }

    /// Record for `label` only if the label is actually known.
    pub fn get(&self, label: &str) -> Option<&DisposalRecord> {
        self.records.get(&canonical_label(label))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn unknown(&self) -> &DisposalRecord {
        &self.unknown
    }

    pub fn display_name(&self, label: &str) -> Option<&str> {
        self.get(label).and_then(|r| r.display_name.as_deref())
    }

    /// Known labels in sorted order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.records.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
