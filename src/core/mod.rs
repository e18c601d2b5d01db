//! Core infrastructure shared across the service
//!
//! Logging setup and shutdown coordination. Domain logic lives in the
//! catalog, queue, scanner, scm, and pipeline modules.

pub mod logging;
pub mod shutdown;
