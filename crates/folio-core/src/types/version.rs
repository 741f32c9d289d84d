//! Version selection for reads and deletes.
//!
//! Callers on the wire use `doc_version = 0` to mean "unspecified". That
//! sentinel is decoded once, at the boundary, into these enums so the store
//! never compares against a magic number.

use serde::{Deserialize, Serialize};

/// Raw version value meaning "unspecified".
pub const UNSPECIFIED_VERSION: i64 = 0;

/// Which version a read should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSelector {
    /// The version with the highest number.
    Latest,
    /// Exactly this version.
    Exact(i64),
}

impl VersionSelector {
    /// Decode a raw wire value (0 = latest).
    pub fn from_raw(doc_version: i64) -> Self {
        if doc_version == UNSPECIFIED_VERSION {
            Self::Latest
        } else {
            Self::Exact(doc_version)
        }
    }

    /// Encode back to the wire value.
    pub fn as_raw(&self) -> i64 {
        match self {
            Self::Latest => UNSPECIFIED_VERSION,
            Self::Exact(v) => *v,
        }
    }
}

impl From<i64> for VersionSelector {
    fn from(doc_version: i64) -> Self {
        Self::from_raw(doc_version)
    }
}

/// Which versions a delete should remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteScope {
    /// Every version of the document.
    AllVersions,
    /// Exactly one version.
    Version(i64),
}

impl DeleteScope {
    /// Decode a raw wire value (0 = all versions).
    pub fn from_raw(doc_version: i64) -> Self {
        if doc_version == UNSPECIFIED_VERSION {
            Self::AllVersions
        } else {
            Self::Version(doc_version)
        }
    }

    /// Encode back to the wire value.
    pub fn as_raw(&self) -> i64 {
        match self {
            Self::AllVersions => UNSPECIFIED_VERSION,
            Self::Version(v) => *v,
        }
    }
}

impl From<i64> for DeleteScope {
    fn from(doc_version: i64) -> Self {
        Self::from_raw(doc_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_latest() {
        assert_eq!(VersionSelector::from_raw(0), VersionSelector::Latest);
        assert_eq!(VersionSelector::from(4), VersionSelector::Exact(4));
        assert_eq!(VersionSelector::Latest.as_raw(), 0);
    }

    #[test]
    fn test_zero_is_all_versions() {
        assert_eq!(DeleteScope::from_raw(0), DeleteScope::AllVersions);
        assert_eq!(DeleteScope::from(2), DeleteScope::Version(2));
        assert_eq!(DeleteScope::Version(2).as_raw(), 2);
    }
}
