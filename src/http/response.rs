//! Response rendering.
//!
//! # Responsibilities
//! - Render handler outcomes as JSON responses
//! - Map handler and routing errors to HTTP status codes
//! - Emit `Allow` headers for 405 and OPTIONS answers
//!
//! # Design Decisions
//! - Every error body has the shape `{"error": "..."}`
//! - NoMatchingRoute is a 404, never a silent default

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::handler::{HandlerError, HandlerResponse};

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let allow = match &self {
            HandlerError::MethodNotAllowed { allowed } => Some(allow_header(allowed)),
            _ => None,
        };

        let mut response = error_response(status, &self.to_string());
        if let Some(value) = allow {
            response.headers_mut().insert(header::ALLOW, value);
        }
        response
    }
}

/// JSON error body with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// 404 for a path no route matches.
pub fn not_found(path: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        &format!("No route matches path {:?}", path),
    )
}

/// 301 to `location`.
pub fn permanent_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = StatusCode::MOVED_PERMANENTLY.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        Err(_) => not_found(location),
    }
}

/// Empty 200 listing the methods a handler supports.
pub fn options_response(allowed: &[Method]) -> Response {
    let mut response = StatusCode::OK.into_response();
    response.headers_mut().insert(header::ALLOW, allow_header(allowed));
    response
}

/// `Allow` value; OPTIONS is always included, HEAD whenever GET is.
fn allow_header(allowed: &[Method]) -> HeaderValue {
    let mut methods: Vec<&str> = allowed.iter().map(Method::as_str).collect();
    if allowed.contains(&Method::GET) && !allowed.contains(&Method::HEAD) {
        methods.push(Method::HEAD.as_str());
    }
    if !allowed.contains(&Method::OPTIONS) {
        methods.push(Method::OPTIONS.as_str());
    }

    HeaderValue::from_str(&methods.join(", ")).unwrap_or_else(|_| HeaderValue::from_static("OPTIONS"))
}
