//! Filter types for collection queries.
//!
//! Queries against a document collection use field equality only, with an
//! optional sort on a single field and an optional limit.

use serde::{Deserialize, Serialize};

use super::document::StoredDocument;

/// A field of a stored record that can be filtered or sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentField {
    /// The embedded document's identifier.
    DocId,
    /// The record's version number.
    DocVersion,
}

impl DocumentField {
    /// Dotted path of the field in the persisted record.
    pub fn path(&self) -> &'static str {
        match self {
            Self::DocId => "doc.doc_id",
            Self::DocVersion => "doc_version",
        }
    }

    /// Read the field's value from a record.
    pub fn value_of(&self, record: &StoredDocument) -> i64 {
        match self {
            Self::DocId => record.doc.doc_id,
            Self::DocVersion => record.doc_version,
        }
    }
}

/// A single equality condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Field to compare.
    pub field: DocumentField,
    /// Value the field must equal.
    pub value: i64,
}

impl FilterCondition {
    /// Create an equality condition.
    pub fn eq(field: DocumentField, value: i64) -> Self {
        Self { field, value }
    }

    fn matches(&self, record: &StoredDocument) -> bool {
        self.field.value_of(record) == self.value
    }
}

/// Conjunction of equality conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<FilterCondition>,
}

impl Filter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a single-condition equality filter.
    pub fn eq(field: DocumentField, value: i64) -> Self {
        Self {
            conditions: vec![FilterCondition::eq(field, value)],
        }
    }

    /// Builder: add another equality condition.
    pub fn and_eq(mut self, field: DocumentField, value: i64) -> Self {
        self.conditions.push(FilterCondition::eq(field, value));
        self
    }

    /// `{doc.doc_id = doc_id}`
    pub fn by_doc_id(doc_id: i64) -> Self {
        Self::eq(DocumentField::DocId, doc_id)
    }

    /// `{doc_version = doc_version}`
    pub fn by_version(doc_version: i64) -> Self {
        Self::eq(DocumentField::DocVersion, doc_version)
    }

    /// `{doc.doc_id = doc_id, doc_version = doc_version}`
    pub fn by_doc_and_version(doc_id: i64, doc_version: i64) -> Self {
        Self::by_doc_id(doc_id).and_eq(DocumentField::DocVersion, doc_version)
    }

    /// Check whether a record satisfies every condition.
    pub fn matches(&self, record: &StoredDocument) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }

    /// Whether the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: DocumentField,
    pub direction: SortDirection,
}

/// Options for a find query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOptions {
    /// Optional sort; without it results come back in backend order.
    pub sort: Option<SortSpec>,
    /// Maximum number of records to return.
    pub limit: Option<u64>,
}

impl FindOptions {
    /// Create default options (no sort, no limit).
    pub fn new() -> Self {
        Self::default()
    }

    /// Options selecting only the highest version: sort `doc_version`
    /// descending, limit 1.
    pub fn latest_version() -> Self {
        Self::new()
            .sort(DocumentField::DocVersion, SortDirection::Descending)
            .limit(1)
    }

    /// Builder: set the sort.
    pub fn sort(mut self, field: DocumentField, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec { field, direction });
        self
    }

    /// Builder: set the limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Trait for translating filters to backend-specific formats.
pub trait FilterTranslator {
    type Output;
    type Error;

    /// Translate a filter to the backend-specific format.
    fn translate(&self, filter: &Filter) -> Result<Self::Output, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientDocument;

    fn record(doc_id: i64, doc_version: i64) -> StoredDocument {
        StoredDocument::new(ClientDocument::new(doc_id, "u"), doc_version)
    }

    #[test]
    fn test_filter_matches() {
        let filter = Filter::by_doc_and_version(1, 2);
        assert!(filter.matches(&record(1, 2)));
        assert!(!filter.matches(&record(1, 3)));
        assert!(!filter.matches(&record(2, 2)));

        assert!(Filter::by_version(2).matches(&record(9, 2)));
        assert!(Filter::new().matches(&record(5, 5)));
    }

    #[test]
    fn test_field_paths() {
        assert_eq!(DocumentField::DocId.path(), "doc.doc_id");
        assert_eq!(DocumentField::DocVersion.path(), "doc_version");
    }

    #[test]
    fn test_latest_version_options() {
        let options = FindOptions::latest_version();
        assert_eq!(options.limit, Some(1));
        assert_eq!(
            options.sort,
            Some(SortSpec {
                field: DocumentField::DocVersion,
                direction: SortDirection::Descending,
            })
        );
    }
}
