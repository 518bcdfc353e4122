//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use dramex_rates::{fallback, RateSnapshot};

/// Catch-all failure for handler code outside the fetch/fallback logic.
///
/// The rate service itself never fails; this covers the unexpected.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error body. Fallback rates ride along so clients are never left
/// without usable values, even on the error path.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub rates: RateSnapshot,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            rates: fallback::snapshot(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
