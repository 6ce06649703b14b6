//! Moderation rows as published by an instance's `domain_blocks` endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// How hard an instance moderates another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reduced visibility; federation still happens.
    Silence,

    /// Full block.
    Suspend,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silence => "silence",
            Self::Suspend => "suspend",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of a remote block list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationEntry {
    /// The moderated instance.
    pub domain: String,

    pub severity: Severity,

    /// Public reason, empty when the instance gives none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
}

impl ModerationEntry {
    pub fn new(domain: impl Into<String>, severity: Severity, comment: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            severity,
            comment: comment.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_domain_blocks_payload() {
        let rows: Vec<ModerationEntry> = serde_json::from_value(json!([
            { "domain": "a.example", "digest": "ab12", "severity": "suspend", "comment": "spam" },
            { "domain": "b.example", "digest": "cd34", "severity": "silence", "comment": null },
            { "domain": "c.example", "digest": "ef56", "severity": "silence" }
        ]))
        .unwrap();

        assert_eq!(rows[0], ModerationEntry::new("a.example", Severity::Suspend, "spam"));
        assert_eq!(rows[1].comment, "");
        assert_eq!(rows[2].severity, Severity::Silence);
        assert_eq!(rows[2].comment, "");
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let parsed = serde_json::from_value::<ModerationEntry>(json!({
            "domain": "a.example",
            "severity": "noop"
        }));

        assert!(parsed.is_err());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Silence.to_string(), "silence");
        assert_eq!(Severity::Suspend.to_string(), "suspend");
    }
}
