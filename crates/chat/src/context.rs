use serde::{Deserialize, Serialize};

/// Conversational memory held by the client and sent with every chat turn.
///
/// Advisory only: blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    #[serde(default)]
    pub last_class: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl ChatContext {
    pub fn new(last_class: Option<String>, last_name: Option<String>) -> Self {
        Self {
            last_class,
            last_name,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Context for an item detected by a previous analysis.
    pub fn detected(last_class: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::new(Some(last_class.into()), Some(last_name.into()))
    }

    pub fn last_class(&self) -> Option<&str> {
        non_blank(self.last_class.as_deref())
    }

    pub fn last_name(&self) -> Option<&str> {
        non_blank(self.last_name.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_absent() {
        let ctx = ChatContext::new(Some("  ".to_string()), Some(String::new()));
        assert_eq!(ctx.last_class(), None);
        assert_eq!(ctx.last_name(), None);

        let ctx = ChatContext::detected(" battery ", "Battery");
        assert_eq!(ctx.last_class(), Some("battery"));
        assert_eq!(ctx.last_name(), Some("Battery"));
    }

    #[test]
    fn missing_json_fields_deserialize_as_none() {
        let ctx: ChatContext = serde_json::from_str("{}").unwrap();
        assert_eq!(ctx, ChatContext::empty());
    }
}
