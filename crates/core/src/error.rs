use thiserror::Error;

/// A form field or CSV cell that could not be turned into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

/// Startup configuration failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    MissingSecret(&'static str),
}
