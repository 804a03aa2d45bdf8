use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one persisted template record (the file stem on disk).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_index(n: u64) -> Self {
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id can name a single entry of a flat store: non-empty, no
    /// path separators, not `.` or `..`.
    pub fn is_plain(&self) -> bool {
        let id = self.0.as_str();
        !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
    }

    /// Sort key: numeric ids ascending, then everything else lexically.
    pub fn order_key(&self) -> (u64, &str) {
        (self.0.parse::<u64>().unwrap_or(u64::MAX), &self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reusable problem-solving strategy distilled from a solved question.
///
/// Loaded templates carry the `locator` of the record they came from; freshly
/// extracted ones carry none until they are saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub title: String,
    pub content: String,
    pub locator: Option<RecordId>,
}

impl Template {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            locator: None,
        }
    }

    pub fn with_locator(mut self, locator: RecordId) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Checks the persistence invariant: both fields present and non-blank.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("content is empty".to_string());
        }
        Ok(())
    }

    pub fn to_record(&self) -> TemplateRecord {
        TemplateRecord {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// On-disk shape of a template: exactly `{"title": ..., "content": ...}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub title: String,
    pub content: String,
}

impl TemplateRecord {
    pub fn into_template(self, locator: RecordId) -> Template {
        Template {
            title: self.title,
            content: self.content,
            locator: Some(locator),
        }
    }
}

/// Templates in storage enumeration order. Indices are only stable for one run.
pub type TemplateSet = Vec<Template>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(Template::new("t", "c").validate().is_ok());
        assert!(Template::new("  ", "c").validate().is_err());
        assert!(Template::new("t", "\n").validate().is_err());
    }

    #[test]
    fn test_record_keeps_locator_out_of_json() {
        let t = Template::new("Bisection", "halve the interval").with_locator(RecordId::new("3"));
        let json = serde_json::to_string(&t.to_record()).unwrap();
        assert_eq!(json, r#"{"title":"Bisection","content":"halve the interval"}"#);

        let back: TemplateRecord = serde_json::from_str(&json).unwrap();
        let loaded = back.into_template(RecordId::new("3"));
        assert_eq!(loaded, t);
    }

    #[test]
    fn test_is_plain_rejects_path_like_ids() {
        for id in ["0", "17", "notes", "a..b"] {
            assert!(RecordId::new(id).is_plain(), "{id}");
        }
        for id in ["", ".", "..", "../x", "a/b", "/etc/passwd", "..\\x", "a\0b"] {
            assert!(!RecordId::new(id).is_plain(), "{id:?}");
        }
    }

    #[test]
    fn test_order_key_numeric_before_names() {
        let mut ids = vec![
            RecordId::new("10"),
            RecordId::new("notes"),
            RecordId::new("2"),
            RecordId::new("0"),
        ];
        ids.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        let ids: Vec<&str> = ids.iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, ["0", "2", "10", "notes"]);
    }
}
