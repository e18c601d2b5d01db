//! Application layer: CLI, configuration, and startup wiring.

pub mod cli;
pub mod config;
pub mod error;
pub mod startup;
