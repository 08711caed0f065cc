//! HTTP front end for quakedb.
//!
//! Server-rendered forms for inserting and querying earthquakes and for
//! uploading CSV catalogs, plus `/health` and `/api/version`.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
pub mod flash;
mod handlers;
mod views;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use quakedb_service::QuakeService;
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub service: Arc<QuakeService>,
    /// Largest accepted `/upload` request body.
    pub upload_limit_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.upload_limit_bytes;
    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route(
            "/insert",
            get(handlers::pages::insert_form).post(handlers::insert::insert_earthquake),
        )
        .route("/query", get(handlers::pages::query_form).post(handlers::query::run_query))
        .route(
            "/upload",
            get(handlers::pages::upload_form)
                .post(handlers::upload::upload_catalog)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
