//! Document types.

use serde::{Deserialize, Serialize};

/// One element of a client document (a piece of text and its kind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element text.
    pub text: String,
    /// Element kind, e.g. "h2" or "p".
    #[serde(rename = "type")]
    pub kind: String,
}

impl Element {
    /// Create a new element.
    pub fn new(text: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: kind.into(),
        }
    }
}

/// The caller-visible document.
///
/// `doc_id` names the logical document across all of its versions; it is
/// only unique together with a version number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDocument {
    /// Caller-assigned identifier.
    pub doc_id: i64,
    /// Source URL of the document.
    #[serde(default)]
    pub doc_url: String,
    /// Ordered document elements.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl ClientDocument {
    /// Create a new document with no elements.
    pub fn new(doc_id: i64, doc_url: impl Into<String>) -> Self {
        Self {
            doc_id,
            doc_url: doc_url.into(),
            elements: Vec::new(),
        }
    }

    /// Builder: append an element.
    pub fn with_element(mut self, text: impl Into<String>, kind: impl Into<String>) -> Self {
        self.elements.push(Element::new(text, kind));
        self
    }

    /// Builder: replace all elements.
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }
}

/// The persisted record: one immutable revision of a [`ClientDocument`].
///
/// Serialized as `{"doc_version": n, "doc": {...}}`. Versions start at 1;
/// 0 is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Version number within `doc.doc_id`.
    pub doc_version: i64,
    /// Document payload at this version.
    pub doc: ClientDocument,
}

impl StoredDocument {
    /// Create a stored record for a payload at the given version.
    pub fn new(doc: ClientDocument, doc_version: i64) -> Self {
        Self { doc_version, doc }
    }

    /// The identifier of the embedded document.
    pub fn doc_id(&self) -> i64 {
        self.doc.doc_id
    }

    /// Consume the record, keeping only the payload.
    pub fn into_client_document(self) -> ClientDocument {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_document_wire_format() {
        let doc = ClientDocument::new(1, "www.test.com").with_element("testing 123", "h2");
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(
            value,
            json!({
                "doc_id": 1,
                "doc_url": "www.test.com",
                "elements": [{"text": "testing 123", "type": "h2"}]
            })
        );
    }

    #[test]
    fn test_client_document_defaults() {
        let doc: ClientDocument = serde_json::from_value(json!({"doc_id": 9})).unwrap();
        assert_eq!(doc.doc_id, 9);
        assert!(doc.doc_url.is_empty());
        assert!(doc.elements.is_empty());
    }

    #[test]
    fn test_client_document_requires_doc_id() {
        let result: Result<ClientDocument, _> =
            serde_json::from_value(json!({"doc_url": "a", "elements": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_elements_replaces_existing() {
        let doc = ClientDocument::new(4, "b")
            .with_element("old", "p")
            .with_elements(vec![Element::new("title", "h1"), Element::new("body", "p")]);

        let kinds: Vec<&str> = doc.elements.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["h1", "p"]);
        assert_eq!(doc.elements[0].text, "title");
    }

    #[test]
    fn test_stored_document_layout() {
        let stored = StoredDocument::new(ClientDocument::new(3, "a"), 2);
        let value = serde_json::to_value(&stored).unwrap();

        assert_eq!(value["doc_version"], json!(2));
        assert_eq!(value["doc"]["doc_id"], json!(3));
        assert_eq!(stored.doc_id(), 3);
        assert_eq!(stored.into_client_document().doc_url, "a");
    }
}
