//! Plain form pages. Each one shows and consumes any pending flash notice.

use axum::response::Response;

use crate::api_error::ApiError;
use crate::flash::Flash;
use crate::views;

pub async fn index(flash: Flash) -> Result<Response, ApiError> {
    Ok(flash.page(views::index(flash.notice())?))
}

pub async fn insert_form(flash: Flash) -> Result<Response, ApiError> {
    Ok(flash.page(views::insert_form(flash.notice())?))
}

pub async fn query_form(flash: Flash) -> Result<Response, ApiError> {
    Ok(flash.page(views::query_form(flash.notice())?))
}

pub async fn upload_form(flash: Flash) -> Result<Response, ApiError> {
    Ok(flash.page(views::upload_form(flash.notice())?))
}
