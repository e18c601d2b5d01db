//! lichen: a pull-request license scanning service.
//!
//! Pull requests arrive as tasks on a durable FIFO queue; each one is
//! taken through the scan pipeline: changed-file download, license
//! detection, conflict matching against the catalog, and a report posted
//! back to the hosting platform.

pub mod app;
pub mod catalog;
pub mod core;
pub mod pipeline;
pub mod queue;
pub mod scanner;
pub mod scm;
pub mod store;

include!(concat!(env!("OUT_DIR"), "/version.rs"));
