//! Core types for quakedb
//!
//! Earthquake records, typed parsing of form and CSV input, the two canned
//! query shapes, and startup configuration. Shared by every other crate.

mod config;
mod constants;
mod earthquake;
mod env_config;
mod error;
pub mod fields;
mod query;

pub use config::*;
pub use constants::*;
pub use earthquake::*;
pub use env_config::*;
pub use error::*;
pub use query::*;
