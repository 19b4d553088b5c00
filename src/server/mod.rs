//! Request authentication helpers for HTTP services.
//!
//! Services behind an authenticating proxy receive the caller's identity in
//! the `X-Auth-UserId` header. [`authenticated_userid`] extracts it and
//! rejects unauthenticated requests with a `401` JSON body.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::http::HeaderMap;
//! use svckit::server::authenticated_userid;
//!
//! async fn handler(headers: HeaderMap) -> Result<String, svckit::server::AuthError> {
//!     let userid = authenticated_userid(&headers)?;
//!     Ok(format!("hello, {}", userid))
//! }
//! ```

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Header carrying the authenticated user id, set by the fronting proxy.
pub const AUTH_USER_HEADER: &str = "X-Auth-UserId";

/// Authentication failures, rendered as `401` responses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The request carried no authentication header.
    #[error("Missing authentication header")]
    MissingHeader,

    /// The header was present but not valid UTF-8.
    #[error("Invalid authentication header")]
    InvalidHeader,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extract the authenticated user id from request headers.
///
/// On success the user id is also recorded on the current tracing span, so
/// every record logged while serving the request carries it.
pub fn authenticated_userid(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get(AUTH_USER_HEADER)
        .ok_or(AuthError::MissingHeader)?;
    let userid = value.to_str().map_err(|_| AuthError::InvalidHeader)?;

    tracing::debug!(uid = %userid, "authenticated request");
    Ok(userid.to_string())
}
