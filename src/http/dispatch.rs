//! Request dispatch through the route table.
//!
//! # Responsibilities
//! - Strip the leading slash and mount prefix from the request path
//! - Resolve the remainder against the route table
//! - Redirect to the slashed path when only the trailing slash is missing
//! - Decode query and JSON body, then invoke the handler for the verb
//!
//! # Design Decisions
//! - One axum fallback handles every path; the route table alone decides matches
//! - The table is shared read-only through `Arc`; no locks on the request path
//! - Handlers run inline (they never block)

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::extract::{Query, State};
use axum::http::{Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;

use crate::config::RoutingConfig;
use crate::handler::{RequestContext, SharedHandler};
use crate::http::request::request_id;
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{ResolvedRoute, RouteError, RouteResult, RouteTable};

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable<SharedHandler>>,
    pub routing: Arc<RoutingConfig>,
    pub max_body_size: usize,
}

impl AppState {
    /// Resolve an absolute request path.
    pub fn locate(&self, path: &str) -> RouteResult<ResolvedRoute<'_, SharedHandler>> {
        let relative = path.strip_prefix('/').unwrap_or(path);
        let relative = relative
            .strip_prefix(self.routing.mount_prefix.as_str())
            .ok_or_else(|| RouteError::NoMatchingRoute(path.to_string()))?;
        self.table.resolve(relative)
    }

    /// Location to redirect to when appending a slash makes the path resolve.
    fn slash_redirect(&self, method: &Method, uri: &Uri) -> Option<String> {
        if !self.routing.append_slash || !(*method == Method::GET || *method == Method::HEAD) {
            return None;
        }

        let path = uri.path();
        if path.ends_with('/') {
            return None;
        }

        let slashed = format!("{}/", path);
        self.locate(&slashed).ok()?;

        Some(match uri.query() {
            Some(query) => format!("{}?{}", slashed, query),
            None => slashed,
        })
    }
}

/// Fallback handler: every request enters here.
pub async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request).to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let path = uri.path();

    let ResolvedRoute { route, params } = match state.locate(path) {
        Ok(resolved) => resolved,
        Err(err) => {
            if let Some(location) = state.slash_redirect(&method, &uri) {
                tracing::debug!(request_id = %request_id, path = %path, location = %location, "Redirecting to slashed path");
                metrics::record_request(method.as_str(), 301, "none", start_time);
                return response::permanent_redirect(&location);
            }

            tracing::warn!(request_id = %request_id, path = %path, error = %err, "No route matched");
            metrics::record_request(method.as_str(), 404, "none", start_time);
            return response::not_found(path);
        }
    };

    let route_name = route.name();
    let handler = route.handler().clone();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        route = route_name,
        handler = handler.name(),
        "Route resolved"
    );

    if method == Method::OPTIONS {
        metrics::record_request(method.as_str(), 200, route_name, start_time);
        return response::options_response(&handler.allowed_methods());
    }

    let query = match Query::<HashMap<String, String>>::try_from_uri(&uri) {
        Ok(Query(query)) => query,
        Err(e) => {
            metrics::record_request(method.as_str(), 400, route_name, start_time);
            return response::error_response(StatusCode::BAD_REQUEST, &e.body_text());
        }
    };

    let bytes = match to_bytes(request.into_body(), state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) if exceeds_limit(&e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request body too large");
            metrics::record_request(method.as_str(), 413, route_name, start_time);
            return response::error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request body unreadable");
            metrics::record_request(method.as_str(), 400, route_name, start_time);
            return response::error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let body = if bytes.is_empty() {
        None
    } else {
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                metrics::record_request(method.as_str(), 400, route_name, start_time);
                return response::error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid JSON body: {}", e),
                );
            }
        }
    };

    let ctx = RequestContext {
        params,
        query,
        body,
    };

    let response = match handler.dispatch(&method, &ctx) {
        Ok(res) => res.into_response(),
        Err(err) => {
            tracing::info!(request_id = %request_id, route = route_name, error = %err, "Handler rejected request");
            err.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), route_name, start_time);
    response
}

/// Whether a body read failed on the size limit rather than the transport.
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organization::{url_patterns, OrganizationDirectory};

    fn state(mount_prefix: &str) -> AppState {
        let table = url_patterns(Arc::new(OrganizationDirectory::new())).unwrap();
        AppState {
            table: Arc::new(table),
            routing: Arc::new(RoutingConfig {
                mount_prefix: mount_prefix.to_string(),
                append_slash: true,
            }),
            max_body_size: 1024,
        }
    }

    #[test]
    fn test_locate_strips_prefix() {
        let state = state("organization/");

        let resolved = state.locate("/organization/org/42/").unwrap();
        assert_eq!(resolved.name(), "organization_detail");
        assert_eq!(resolved.params.get_int("id"), Some(42));

        assert!(state.locate("/org/42/").is_err());
        assert!(state.locate("/organization/unknown-path/").is_err());
    }

    #[test]
    fn test_locate_at_root() {
        let state = state("");
        assert_eq!(state.locate("/is-org/").unwrap().name(), "organization_check");
    }

    #[test]
    fn test_slash_redirect() {
        let state = state("organization/");

        let uri: Uri = "/organization/is-org?name=acme".parse().unwrap();
        assert_eq!(
            state.slash_redirect(&Method::GET, &uri),
            Some("/organization/is-org/?name=acme".to_string())
        );

        // Only for safe methods
        assert_eq!(state.slash_redirect(&Method::POST, &uri), None);

        // Not when the slashed path would not resolve either
        let uri: Uri = "/organization/nothing".parse().unwrap();
        assert_eq!(state.slash_redirect(&Method::GET, &uri), None);
    }

    #[tokio::test]
    async fn test_only_length_limit_is_too_large() {
        let err = to_bytes(Body::from("0123456789"), 4).await.unwrap_err();
        assert!(exceeds_limit(&err));

        let err = axum::Error::new(std::io::Error::other("connection reset"));
        assert!(!exceeds_limit(&err));
    }
}
