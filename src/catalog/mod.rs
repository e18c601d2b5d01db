//! License catalog: known licenses, access classification, and the
//! conflict table used to match detected licenses against each other
//! and against the repository license.

pub mod catalog;
pub mod matcher;
pub mod types;

pub use catalog::{CatalogSnapshot, ConflictSource, LicenseCatalog};
pub use types::{ConflictPair, License, LicenseAccess};

#[cfg(test)]
pub(crate) mod tests;
