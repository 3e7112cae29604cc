//! Declarative send-time configuration overlay

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Override-point keys understood by the composer.
pub mod keys {
    /// Gate deciding whether a send is attempted at all.
    pub const ENABLE: &str = "_enable";
    /// Additional receiver address; applied only together with
    /// [`RECEIVER_NAME`].
    pub const RECEIVER_EMAIL: &str = "receiver.email";
    /// Additional receiver display name; applied only together with
    /// [`RECEIVER_EMAIL`].
    pub const RECEIVER_NAME: &str = "receiver.name";
    /// Additional sender address; applied only together with
    /// [`SENDER_NAME`].
    pub const SENDER_EMAIL: &str = "sender.email";
    /// Additional sender display name; applied only together with
    /// [`SENDER_EMAIL`].
    pub const SENDER_NAME: &str = "sender.name";
    /// Replacement subject line.
    pub const SUBJECT: &str = "subject";
    /// Single carbon-copy address without display name.
    pub const CC: &str = "cc";
    /// Numeric message priority.
    pub const PRIORITY: &str = "priority";
    /// Comma-separated list of attachment file paths.
    pub const ATTACHMENTS: &str = "attachments";
    /// Comma-separated list of image files to embed into the body.
    pub const EMBED_IMAGE: &str = "embedImage";
}

/// One raw overlay entry: a literal value plus an optional dynamic
/// expression evaluated by the resolver collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawValue {
    /// Literal value used when no expression applies
    #[serde(default)]
    pub value: String,

    /// Expression evaluated against the resolve context
    #[serde(default)]
    pub expression: Option<String>,
}

impl RawValue {
    /// Entry carrying only a literal value
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expression: None,
        }
    }

    /// Entry carrying an expression and no literal fallback
    pub fn dynamic(expression: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            expression: Some(expression.into()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::literal(value)
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::literal(value)
    }
}

/// Configuration overlay supplying optional overrides for message fields,
/// evaluated once per send. Read-only for the duration of one `send` call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigOverlay(HashMap<String, RawValue>);

impl ConfigOverlay {
    /// Create an empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, consuming and returning the overlay
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Add an entry in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RawValue>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up an entry
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    /// Whether the overlay holds no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Split a comma-separated list, trimming whitespace around each segment
/// and discarding empty segments.
pub fn trim_split(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_split_trims_and_drops_empty_segments() {
        assert_eq!(
            trim_split("a.png, b.png,  c.png"),
            vec!["a.png", "b.png", "c.png"]
        );
    }

    #[test]
    fn test_trim_split_ignores_trailing_commas() {
        assert_eq!(trim_split("a.png,,b.png, ,"), vec!["a.png", "b.png"]);
        assert!(trim_split("").is_empty());
        assert!(trim_split(" , ").is_empty());
    }

    #[test]
    fn test_overlay_entries() {
        let overlay = ConfigOverlay::new()
            .with(keys::ENABLE, "1")
            .with(keys::SUBJECT, RawValue::dynamic("user.subject"));

        assert_eq!(overlay.get(keys::ENABLE), Some(&RawValue::literal("1")));
        assert_eq!(
            overlay.get(keys::SUBJECT).and_then(|raw| raw.expression.as_deref()),
            Some("user.subject")
        );
        assert!(overlay.get(keys::CC).is_none());
    }

    #[test]
    fn test_overlay_deserializes_from_json() {
        let overlay: ConfigOverlay = serde_json::from_str(
            r#"{ "_enable": { "value": "1" }, "cc": { "expression": "user.email" } }"#,
        )
        .unwrap();

        assert_eq!(overlay.get(keys::ENABLE).unwrap().value, "1");
        assert_eq!(
            overlay.get(keys::CC).unwrap().expression.as_deref(),
            Some("user.email")
        );
    }
}
