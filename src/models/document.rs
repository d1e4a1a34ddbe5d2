use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a note.
///
/// UUID-backed but carried as a plain string so callers (URLs, MongoDB
/// filters, server function payloads) never depend on the representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A note stored in the `documents` collection.
///
/// `is_published` is the single durable flag the publish controller mutates;
/// everything else is regular note content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Identifier, used as the Mongo `_id` and in preview URLs.
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Human-readable title.
    pub title: String,
    /// Raw Markdown content.
    pub content: String,
    /// Whether the note is visible at its public preview URL.
    #[serde(default)]
    pub is_published: bool,
    /// Timestamp of the last update.
    pub last_updated: DateTime<Utc>,
}

impl Document {
    /// Create a new unpublished note with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: DocumentId::generate(),
            title: title.into(),
            content: String::new(),
            is_published: false,
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(DocumentId::generate(), DocumentId::generate());
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = DocumentId::from("doc_123".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"doc_123\"");
    }

    #[test]
    fn new_documents_start_unpublished() {
        let doc = Document::new("Untitled");
        assert!(!doc.is_published);
        assert_eq!(doc.title, "Untitled");
    }
}
