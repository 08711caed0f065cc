//! One-shot flash notices carried across a redirect in a cookie.
//!
//! The cookie holds a short typed code (`inserted`, `uploaded.3.1`,
//! `invalid-upload`), never user-visible text. The page that shows the
//! notice clears the cookie with `Max-Age=0`.

use std::convert::Infallible;
use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Serialize;

pub const FLASH_COOKIE: &str = "quakedb_flash";

const CLEAR_COOKIE: &str = "quakedb_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Inserted,
    Uploaded { inserted: usize, skipped: usize },
    InvalidUpload,
}

/// What templates see for a notice.
#[derive(Debug, Serialize)]
pub struct NoticeView {
    pub level: &'static str,
    pub message: &'static str,
    pub detail: Option<String>,
}

impl Notice {
    pub fn decode(code: &str) -> Option<Self> {
        match code {
            "inserted" => Some(Self::Inserted),
            "invalid-upload" => Some(Self::InvalidUpload),
            _ => {
                let counts = code.strip_prefix("uploaded.")?;
                let (inserted, skipped) = counts.split_once('.')?;
                Some(Self::Uploaded {
                    inserted: inserted.parse().ok()?,
                    skipped: skipped.parse().ok()?,
                })
            },
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Inserted => "Earthquake record inserted successfully!",
            Self::Uploaded { .. } => {
                "CSV data uploaded successfully (skipped blank lines and ignored duplicates)!"
            },
            Self::InvalidUpload => "Please upload a valid CSV file.",
        }
    }

    pub fn view(self) -> NoticeView {
        let (level, detail) = match self {
            Self::Inserted => ("success", None),
            Self::Uploaded { inserted, skipped } => (
                "success",
                Some(format!("{inserted} rows inserted, {skipped} duplicate rows skipped.")),
            ),
            Self::InvalidUpload => ("error", None),
        };
        NoticeView { level, message: self.message(), detail }
    }

    fn set_cookie(self) -> String {
        format!("{FLASH_COOKIE}={self}; Path=/; HttpOnly; SameSite=Lax")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted => f.write_str("inserted"),
            Self::Uploaded { inserted, skipped } => write!(f, "uploaded.{inserted}.{skipped}"),
            Self::InvalidUpload => f.write_str("invalid-upload"),
        }
    }
}

/// 303 to `location`, leaving `notice` for the next rendered page.
pub fn redirect(location: &str, notice: Notice) -> Response {
    ([(SET_COOKIE, notice.set_cookie())], Redirect::to(location)).into_response()
}

/// Pending notice from the request cookies, if any.
#[derive(Debug, Default)]
pub struct Flash {
    notice: Option<Notice>,
    present: bool,
}

impl Flash {
    pub fn from_cookie_header(values: &[&str]) -> Self {
        let raw = values
            .iter()
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .map(|(_, value)| value.trim());
        match raw {
            Some(code) => Self { notice: Notice::decode(code), present: true },
            None => Self::default(),
        }
    }

    pub const fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Wrap a rendered page, consuming the notice if one was pending.
    pub fn page(&self, html: String) -> Response {
        let mut response = Html(html).into_response();
        if self.present {
            response.headers_mut().append(SET_COOKIE, HeaderValue::from_static(CLEAR_COOKIE));
        }
        response
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let values: Vec<&str> =
            parts.headers.get_all(COOKIE).iter().filter_map(|v| v.to_str().ok()).collect();
        Ok(Self::from_cookie_header(&values))
    }
}
