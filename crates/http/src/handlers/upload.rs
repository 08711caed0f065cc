use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Response;
use quakedb_service::ServiceError;

use crate::api_error::ApiError;
use crate::flash::{self, Notice};
use crate::AppState;

/// The `file` part of an upload form.
struct FilePart {
    name: Option<String>,
    bytes: Vec<u8>,
}

pub async fn upload_catalog(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let Some(file) = read_file_part(multipart, state.upload_limit_bytes).await? else {
        tracing::info!("upload rejected: no file part");
        return Ok(flash::redirect("/upload", Notice::InvalidUpload));
    };

    match state.service.ingest_upload(file.name.as_deref(), &file.bytes).await {
        Ok(outcome) => Ok(flash::redirect(
            "/",
            Notice::Uploaded { inserted: outcome.report.inserted, skipped: outcome.report.skipped },
        )),
        Err(ServiceError::InvalidUpload(reason)) => {
            tracing::info!(%reason, "upload rejected");
            Ok(flash::redirect("/upload", Notice::InvalidUpload))
        },
        Err(e) => Err(e.into()),
    }
}

/// Pull the `file` field out of the form, ignoring any other fields.
async fn read_file_part(
    mut multipart: Multipart,
    upload_limit_bytes: usize,
) -> Result<Option<FilePart>, ApiError> {
    let mut file = None;
    while let Some(field) =
        multipart.next_field().await.map_err(|e| multipart_error(&e, upload_limit_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().map(ToOwned::to_owned);
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e, upload_limit_bytes))?;
        file = Some(FilePart { name, bytes: bytes.to_vec() });
    }
    Ok(file)
}

fn multipart_error(e: &MultipartError, upload_limit_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!(
            "File too large. Maximum upload size is {}.",
            format_limit(upload_limit_bytes)
        ))
    } else {
        ApiError::BadRequest(format!("Failed to read upload: {}", e.body_text()))
    }
}

/// Largest whole unit that divides the limit exactly.
fn format_limit(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = KIB * KIB;
    match bytes {
        b if b >= MIB && b % MIB == 0 => format!("{} MiB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{} KiB", b / KIB),
        b => format!("{b} bytes"),
    }
}
