//! Core traits for folio backends and services.

mod collection;
mod service;

pub use collection::*;
pub use service::*;
