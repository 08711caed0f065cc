//! Service layer for quakedb
//!
//! Sits between the HTTP handlers (and the CLI) and storage: validates form
//! input, persists and parses uploaded catalogs, and runs the store calls.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod error;
mod quake_service;
pub mod upload;

pub use error::ServiceError;
pub use quake_service::{QuakeService, QueryOutcome, UploadOutcome};
