use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use quakedb_core::QueryInput;

use crate::api_error::ApiError;
use crate::views;
use crate::AppState;

pub async fn run_query(
    State(state): State<Arc<AppState>>,
    Form(input): Form<QueryInput>,
) -> Result<Response, ApiError> {
    let outcome = state.service.query(&input).await?;
    tracing::info!(query = %outcome.kind, rows = outcome.matches.len(), "query served");
    Ok(Html(views::results(&outcome)?).into_response())
}
