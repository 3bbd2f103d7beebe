//! Common error types for the SoilCare service

use thiserror::Error;

/// Common result type for SoilCare operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the service and the CLI tool.
///
/// Each variant maps to a stable machine-readable code via [`Error::code`];
/// HTTP status mapping happens at the API boundary, not here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sample table parse error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Artifact deserialization error (wraps serde_json::Error)
    #[error("Artifact parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    Validation(String),

    /// No sample row could be resolved for a query
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Scaling or model invocation failure
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code for this error kind.
    ///
    /// Startup-only kinds (io/csv/artifact/config) never reach a request
    /// boundary; they collapse to "internal" if one ever does.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Resolution(_) => "resolution",
            Error::Prediction(_) => "prediction",
            Error::Io(_) | Error::Csv(_) | Error::Json(_) | Error::Config(_) | Error::Internal(_) => {
                "internal"
            }
        }
    }
}
