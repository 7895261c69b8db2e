//! Error taxonomy of the dashboard
//!
//! Only the startup load is allowed to take the process down. Everything
//! that can go wrong while serving requests either is the caller's fault
//! (an unknown keyword) or degrades the keyword-in-context feature to an
//! empty result set at the handler boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Use this everywhere a dashboard operation can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong inside the dashboard
#[derive(Debug, Error)]
pub enum Error {
    /// A frequency table could not be fetched or parsed
    ///
    /// This is a one-shot startup load with no retry policy, so the
    /// process aborts with a diagnostic instead of serving without data.
    #[error("failed to load the frequency dataset")]
    Load(#[source] anyhow::Error),

    /// No keyword-in-context store is configured
    ///
    /// Raised when `DATABASE_URL` was absent at startup. Handlers convert
    /// this to an empty snippet list so the rest of the dashboard keeps
    /// working.
    #[error("no keyword-in-context store is configured")]
    StoreUnavailable,

    /// The keyword-in-context store failed to answer a query
    ///
    /// Connectivity problems and malformed responses end up here. Logged
    /// and surfaced to the frontend as an empty result set, never as a
    /// raw failure.
    #[error("keyword-in-context query failed")]
    Query(#[from] sqlx::Error),

    /// A requested keyword is not part of the startup vocabulary
    ///
    /// The frontend only offers validated keywords, so hitting this means
    /// a hand-crafted request. It refuses the input instead of guessing a
    /// fallback, and doubles as the guard that keeps arbitrary strings
    /// away from the query path.
    #[error("unknown keyword {0:?}")]
    UnknownKeyword(Box<str>),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::UnknownKeyword(_) => StatusCode::NOT_FOUND,
            Error::StoreUnavailable | Error::Query(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
