//! Core types for folio.

mod document;
mod filter;
mod version;

pub use document::*;
pub use filter::*;
pub use version::*;
