use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::Form;
use quakedb_core::EarthquakeInput;

use crate::api_error::ApiError;
use crate::flash::{self, Notice};
use crate::AppState;

pub async fn insert_earthquake(
    State(state): State<Arc<AppState>>,
    Form(input): Form<EarthquakeInput>,
) -> Result<Response, ApiError> {
    let quake = state.service.insert(&input).await?;
    tracing::info!(id = %quake.id, place = %quake.place, "earthquake record inserted");
    Ok(flash::redirect("/", Notice::Inserted))
}
