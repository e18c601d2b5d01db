//! License detection: the scanner trait and the SCANOSS CLI integration.

pub mod error;
pub mod scanoss;
pub mod types;

pub use error::{ScanError, ScanResult};
pub use scanoss::{LicenseScanner, ScanossScanner};
pub use types::{ComponentInfo, ScannedFile};
