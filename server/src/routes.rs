//! API routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde::Serialize;

use dramex_rates::RateSnapshot;

use crate::csrf::{self, CsrfToken};
use crate::error::AppError;
use crate::state::AppState;

/// Body of the token-issuance endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenBody {
    pub csrf_token: String,
}

/// Build the API router with the CSRF guard applied.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/exchange-rates", get(exchange_rates))
        .route("/api/csrf-token", get(csrf_token))
        .layer(middleware::from_fn_with_state(state.clone(), csrf::guard))
        .with_state(state)
}

/// Current exchange rates.
///
/// Always `200` in practice: upstream failures degrade inside the rate
/// service. The error arm exists for failures outside that logic.
async fn exchange_rates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RateSnapshot>, AppError> {
    Ok(Json(state.rates.get_exchange_rates().await))
}

/// Expose the CSRF token issued (or found) by the guard.
async fn csrf_token(Extension(token): Extension<CsrfToken>) -> Json<CsrfTokenBody> {
    Json(CsrfTokenBody {
        csrf_token: token.0,
    })
}
