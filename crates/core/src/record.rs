use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Label used for anything the classifier cannot place in its label space.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Disposal guidance for one product class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalRecord {
    /// Optional display name; used as the product name shown to users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Waste category (e.g. `"Hazardous"`).
    pub category: String,

    /// Ordered disposal instructions.
    pub disposal_steps: Vec<String>,

    #[serde(default)]
    pub hazards: String,

    #[serde(default)]
    pub tips: String,
}

impl DisposalRecord {
    /// The designated record for labels without an entry of their own.
    pub fn unknown() -> Self {
        Self {
            display_name: None,
            category: "Possibly E-waste".to_string(),
            disposal_steps: vec![
                "I am not fully confident about this item.".to_string(),
                "If it is an electrical or electronic product, please avoid throwing it in the normal dustbin."
                    .to_string(),
                "Take it to an authorised e-waste collection centre for guidance.".to_string(),
            ],
            hazards: "Electronic items may contain hazardous materials.".to_string(),
            tips: "Show this item to staff at a recycling centre.".to_string(),
        }
    }

    pub(crate) fn validate(&self, label: &str) -> ConfigResult<()> {
        if self.category.trim().is_empty() {
            return Err(ConfigError::invalid(
                "disposal rules",
                format!("entry '{label}' has an empty category"),
            ));
        }
        if self.disposal_steps.is_empty() {
            return Err(ConfigError::invalid(
                "disposal rules",
                format!("entry '{label}' has no disposal steps"),
            ));
        }
        if self.disposal_steps.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "disposal rules",
                format!("entry '{label}' contains a blank disposal step"),
            ));
        }
        Ok(())
    }
}

/// Normalize a raw label into the canonical token space.
///
/// Lowercases, trims, and joins inner whitespace runs with `_`, so
/// `" Washing Machine "` becomes `"washing_machine"`.
pub fn canonical_label(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
