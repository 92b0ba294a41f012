//! Session record data structures
//!
//! Wire format (JSON):
//!
//! ```text
//! {
//!   "files": [{ "id", "name", "size", "type", "lastModified" }, ...],
//!   "operation": "merge",
//!   "options": { ... },
//!   "timestamp": 1700000000000
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Tool options, keyed by option name.
///
/// Values are any JSON shape: strings, numbers (integer or float), booleans,
/// `null` for unset optionals, arrays (page ranges, nested lists) and objects.
/// `serde_json::Value` keeps integers and floats distinct, so `80` comes back
/// as `80` and `0.5` as `0.5`.
pub type SessionOptions = serde_json::Map<String, Value>;

/// Metadata-only reference to a user-selected file. Never carries file bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub id: String,
    /// Display name, with extension
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Modification time, epoch milliseconds
    pub last_modified: i64,
}

impl FileDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        last_modified: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            last_modified,
        }
    }

    /// Describe a newly selected file, assigning a fresh random id
    pub fn with_generated_id(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        last_modified: i64,
    ) -> Self {
        Self::new(
            Uuid::new_v4().to_string(),
            name,
            size,
            mime_type,
            last_modified,
        )
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf" || self.name.to_lowercase().ends_with(".pdf")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Selected files, in user-chosen order
    pub files: Vec<FileDescriptor>,
    /// Active tool identifier, e.g. "merge"
    pub operation: String,
    #[serde(default)]
    pub options: SessionOptions,
    /// Epoch milliseconds of the last save. Set by the manager; whatever the
    /// caller puts here is overwritten.
    #[serde(rename = "timestamp")]
    pub saved_at: i64,
}

impl SessionRecord {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            operation: operation.into(),
            options: SessionOptions::new(),
            saved_at: 0,
        }
    }

    pub fn with_file(mut self, file: FileDescriptor) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Total bytes across all selected files
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Position of a file in the selection
    pub fn file_index(&self, id: &str) -> Option<usize> {
        self.files.iter().position(|f| f.id == id)
    }

    /// Whether this record carries the same work as `other`, ignoring
    /// when each was saved
    pub fn same_work(&self, other: &SessionRecord) -> bool {
        self.files == other.files
            && self.operation == other.operation
            && self.options == other.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let record = SessionRecord {
            files: vec![FileDescriptor::new(
                "f1",
                "a.pdf",
                1024,
                "application/pdf",
                1_700_000_000_000,
            )],
            operation: "merge".to_string(),
            options: SessionOptions::new(),
            saved_at: 42,
        }
        .with_option("quality", 80);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "files": [{
                    "id": "f1",
                    "name": "a.pdf",
                    "size": 1024,
                    "type": "application/pdf",
                    "lastModified": 1_700_000_000_000_i64
                }],
                "operation": "merge",
                "options": { "quality": 80 },
                "timestamp": 42
            })
        );
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        let raw = r#"{"files":[],"operation":"split","options":{}}"#;
        assert!(serde_json::from_str::<SessionRecord>(raw).is_err());
    }

    #[test]
    fn test_missing_options_default_to_empty() {
        let raw = r#"{"files":[],"operation":"split","timestamp":5}"#;
        let record: SessionRecord = serde_json::from_str(raw).unwrap();
        assert!(record.options.is_empty());
        assert_eq!(record.saved_at, 5);
    }

    #[test]
    fn test_helpers() {
        let record = SessionRecord::new("compress")
            .with_file(FileDescriptor::new("a", "one.pdf", 10, "application/pdf", 0))
            .with_file(FileDescriptor::with_generated_id("two.PDF", 5, "", 0));

        assert_eq!(record.total_size(), 15);
        assert_eq!(record.file_index("a"), Some(0));
        assert_eq!(record.file_index("missing"), None);
        assert!(record.files.iter().all(FileDescriptor::is_pdf));
        assert_ne!(record.files[1].id, "");

        let mut later = record.clone();
        later.saved_at = 99;
        assert!(record.same_work(&later));
        assert_ne!(record, later);
    }
}
