//! Persistence layer
//!
//! The core reaches storage only through the traits in `traits`; `json`
//! provides the directory-backed implementation used by the binary and the
//! tests.

mod error;
mod json;
mod traits;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use json::JsonStore;
pub use traits::{LicenseStore, ResultStore, TaskStore};
