//! Unified error types for sdamgia.
//!
//! "Not found" outcomes (missing problem block, unknown topic, empty candidate
//! pool) are modelled as `Ok(None)` or empty lists and never appear here.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error type shared by the client and the server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Argument rejected before any I/O (e.g., `period_days < 1`).
    #[error("INVALID_ARGUMENT: {0}")]
    InvalidArgument(String),

    /// Subject code missing from the registry.
    #[error("UNKNOWN_SUBJECT: {0}")]
    UnknownSubject(String),

    /// Non-success HTTP status after the fetcher gave up.
    #[error("HTTP_ERROR: status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Transport-level failure (connect, TLS, body read).
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    Timeout(String),

    /// Redirect response without a `Location` header.
    #[error("MISSING_LOCATION: {0}")]
    MissingLocation(String),

    /// Redirect `Location` that does not carry the expected value.
    #[error("INVALID_REDIRECT: {0}")]
    InvalidRedirect(String),

    /// Expected HTML substructure is absent.
    #[error("STRUCTURE_ERROR: {0}")]
    Structure(String),

    /// Text recognition failed.
    #[error("OCR_FAILED: {0}")]
    Ocr(String),

    /// Problem rendering failed.
    #[error("RENDER_FAILED: {0}")]
    Render(String),

    /// Runtime failure unrelated to the remote site.
    #[error("INTERNAL_ERROR: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this is an HTTP-layer failure.
    ///
    /// These are the errors the fetcher retries and OCR search drops.
    pub fn is_http(&self) -> bool {
        matches!(self, Error::HttpStatus { .. } | Error::Network(_) | Error::Timeout(_))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidArgument(_) | Error::UnknownSubject(_) => -32602,
            Error::HttpStatus { .. } => -32008,
            Error::Network(_) => -32009,
            Error::Timeout(_) => -32006,
            Error::MissingLocation(_) | Error::InvalidRedirect(_) => -32010,
            Error::Structure(_) => -32000,
            Error::Ocr(_) => -32011,
            Error::Render(_) => -32012,
            Error::Internal(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
