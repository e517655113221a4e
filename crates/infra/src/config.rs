//! Process configuration from environment variables.
//!
//! Read once at startup. Every variable has a default; a value that is present
//! but unparsable is a configuration error (the process refuses to start).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use ewaste_core::ConfigError;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const DEFAULT_INPUT_SIZE: u32 = 224;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const RULES_FILE: &str = "disposal_rules.json";
const CLASS_INDEX_FILE: &str = "class_indices.json";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `EWASTE_BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `EWASTE_DATA_DIR`: holds the disposal rules and class index table.
    pub data_dir: PathBuf,
    /// `EWASTE_MODEL_PATH`
    pub model_path: PathBuf,
    /// `EWASTE_INPUT_SIZE`: square model input side in pixels.
    pub input_size: u32,
    /// `EWASTE_CONFIDENCE_THRESHOLD`: below this the item is reported as uncertain.
    pub confidence_threshold: f64,
    /// `EWASTE_MAX_UPLOAD_BYTES`
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from("data"),
            model_path: PathBuf::from("model/ewaste_model.onnx"),
            input_size: DEFAULT_INPUT_SIZE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map instead of the
    /// process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cfg = Self {
            bind_addr: parse_or(&lookup, "EWASTE_BIND_ADDR", defaults.bind_addr)?,
            data_dir: lookup("EWASTE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            model_path: lookup("EWASTE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            input_size: parse_or(&lookup, "EWASTE_INPUT_SIZE", defaults.input_size)?,
            confidence_threshold: parse_or(
                &lookup,
                "EWASTE_CONFIDENCE_THRESHOLD",
                defaults.confidence_threshold,
            )?,
            max_upload_bytes: parse_or(&lookup, "EWASTE_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.input_size == 0 {
            return Err(ConfigError::invalid("environment", "EWASTE_INPUT_SIZE must be positive"));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::invalid(
                "environment",
                "EWASTE_CONFIDENCE_THRESHOLD must be within [0, 1]",
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::invalid(
                "environment",
                "EWASTE_MAX_UPLOAD_BYTES must be positive",
            ));
        }
        Ok(())
    }

    pub fn rules_path(&self) -> PathBuf {
        self.data_dir.join(RULES_FILE)
    }

    pub fn class_index_path(&self) -> PathBuf {
        self.data_dir.join(CLASS_INDEX_FILE)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            ConfigError::invalid("environment", format!("{key}={raw:?} could not be parsed"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.rules_path(), PathBuf::from("data/disposal_rules.json"));
        assert_eq!(cfg.class_index_path(), PathBuf::from("data/class_indices.json"));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("EWASTE_BIND_ADDR", "127.0.0.1:9000"),
            ("EWASTE_DATA_DIR", "/srv/ewaste"),
            ("EWASTE_INPUT_SIZE", " 160 "),
            ("EWASTE_CONFIDENCE_THRESHOLD", "0.75"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cfg.input_size, 160);
        assert_eq!(cfg.confidence_threshold, 0.75);
        assert_eq!(cfg.rules_path(), PathBuf::from("/srv/ewaste/disposal_rules.json"));
    }

    #[test]
    fn unparsable_or_out_of_range_values_fail() {
        for pairs in [
            [("EWASTE_INPUT_SIZE", "big")],
            [("EWASTE_INPUT_SIZE", "0")],
            [("EWASTE_CONFIDENCE_THRESHOLD", "1.5")],
            [("EWASTE_CONFIDENCE_THRESHOLD", "NaN")],
            [("EWASTE_BIND_ADDR", "nowhere")],
            [("EWASTE_MAX_UPLOAD_BYTES", "0")],
        ] {
            let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{pairs:?}");
        }
    }
}
