//! Document versioning.
//!
//! Every stored document revision becomes a new immutable record with the
//! next version number for its `doc_id`. Reads pick the latest or an exact
//! version, deletes remove one version or all of them.

mod locks;
mod store;

pub use locks::{DocLockGuard, DocLocks};
pub use store::VersioningStore;
