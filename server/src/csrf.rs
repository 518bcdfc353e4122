//! Double-submit CSRF protection.
//!
//! Safe methods always pass and are guaranteed a `_csrf` cookie on the way
//! out; unsafe methods must echo the cookie value in the `x-csrf-token`
//! header. Tokens are long-lived (24h), not single-use.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::RngCore;
use serde::Serialize;
use tracing::warn;

use dramex_common::time::constants;

use crate::state::AppState;

/// Name of the token cookie.
pub const CSRF_COOKIE: &str = "_csrf";

/// Request header that must echo the cookie on unsafe methods.
pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_BYTES: usize = 32;

/// Token exposed to handlers through request extensions.
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

#[derive(Debug, Serialize)]
struct RejectionBody {
    message: &'static str,
}

/// CSRF guard middleware.
pub async fn guard(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_token = cookie_value(request.headers(), CSRF_COOKIE);

    if is_safe(request.method()) {
        let (token, issued) = match cookie_token {
            Some(token) => (token, false),
            None => (generate_token(), true),
        };
        request.extensions_mut().insert(CsrfToken(token.clone()));

        let mut response = next.run(request).await;
        if issued {
            if let Ok(value) = HeaderValue::from_str(&issue_cookie(&token, state.config.production))
            {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        return response;
    }

    let header_token = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match (cookie_token, header_token) {
        (Some(cookie), Some(header)) if cookie == header => next.run(request).await,
        _ => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request with missing or mismatched CSRF token"
            );
            (
                StatusCode::FORBIDDEN,
                Json(RejectionBody {
                    message: "Invalid CSRF token",
                }),
            )
                .into_response()
        }
    }
}

fn is_safe(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD || method == Method::OPTIONS
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// Not HttpOnly: the frontend reads the cookie to echo the token in the
// request header.
fn issue_cookie(token: &str, production: bool) -> String {
    let mut cookie = format!(
        "{CSRF_COOKIE}={token}; Max-Age={max_age}; Path=/; SameSite=Strict",
        max_age = constants::csrf_token_ttl().num_seconds()
    );
    if production {
        cookie.push_str("; Secure");
    }
    cookie
}
