use crate::api::models::run::ErrorResponse;
use crate::engine::CalcError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data (bad filename, malformed multipart, unusable cell contents)
    #[error("{message}")]
    BadRequest { message: String },

    /// Upload exceeds the configured size ceiling
    #[error("File too large (max {max_bytes} bytes)")]
    PayloadTooLarge { max_bytes: u64 },

    /// Failure inside the calculation pipeline
    #[error(transparent)]
    Calculation(#[from] CalcError),

    /// Failure writing or reading per-request files
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The result workbook was written but could not be opened for the response
    #[error("Failed to open result workbook: {0}")]
    OutputRead(#[source] std::io::Error),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Closed set of categories reported to clients for unexpected failures.
///
/// Raw diagnostics stay in the server log; clients only ever see one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedWorkbook,
    OutputWrite,
    Storage,
    Internal,
}

impl ErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::MalformedWorkbook => "the uploaded file could not be read as a spreadsheet",
            ErrorKind::OutputWrite => "the result spreadsheet could not be written",
            ErrorKind::Storage => "the uploaded file could not be stored",
            ErrorKind::Internal => "an internal error occurred",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedWorkbook => "MalformedWorkbook",
            ErrorKind::OutputWrite => "OutputWrite",
            ErrorKind::Storage => "Storage",
            ErrorKind::Internal => "Internal",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Calculation(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            Error::Calculation(_)
            | Error::Storage(_)
            | Error::OutputRead(_)
            | Error::Internal { .. }
            | Error::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Category of an unexpected failure, `None` for client errors
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::BadRequest { .. } | Error::PayloadTooLarge { .. } => None,
            Error::Calculation(e) => match e {
                CalcError::Validation(_) => None,
                CalcError::OpenWorkbook(_) | CalcError::NoWorksheets => Some(ErrorKind::MalformedWorkbook),
                CalcError::WriteOutput(_) => Some(ErrorKind::OutputWrite),
            },
            Error::Storage(_) => Some(ErrorKind::Storage),
            Error::OutputRead(_) => Some(ErrorKind::OutputWrite),
            Error::Internal { .. } | Error::Other(_) => Some(ErrorKind::Internal),
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self.kind() {
            None => self.to_string(),
            Some(kind) => format!("Calculation failed: {kind}: {}", kind.user_message()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match self.kind() {
            Some(kind) => tracing::error!(kind = %kind, "Internal service error: {:#}", self),
            None => tracing::debug!("Client error: {}", self),
        }

        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
