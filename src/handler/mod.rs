//! Request handler capability.
//!
//! # Responsibilities
//! - Define the per-verb interface every routed handler implements
//! - Carry request data (captures, query, JSON body) into handlers
//! - Describe handler outcomes independently of the HTTP stack
//!
//! # Design Decisions
//! - One trait method per HTTP verb; unimplemented verbs answer 405
//! - Handlers are synchronous; they never block on I/O
//! - Shared as `Arc<dyn ResourceHandler>` so several routes can bind one instance

pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::routing::Params;

pub use error::{HandlerError, HandlerResult};

/// Handler type stored in the application's route table.
pub type SharedHandler = Arc<dyn ResourceHandler>;

/// Everything a handler sees of a request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Typed path captures.
    pub params: Params,
    /// Decoded query string.
    pub query: HashMap<String, String>,
    /// Parsed JSON body, if the request had one.
    pub body: Option<serde_json::Value>,
}

impl RequestContext {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Deserialize the JSON body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> HandlerResult<T> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| HandlerError::BadRequest("request body is required".into()))?;
        serde_json::from_value(body).map_err(|e| HandlerError::BadRequest(e.to_string()))
    }

    /// Non-empty query parameter, or a 400.
    pub fn required_query(&self, key: &str) -> HandlerResult<&str> {
        self.query
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| HandlerError::BadRequest(format!("query parameter '{}' is required", key)))
    }
}

/// A successful handler outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl HandlerResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn created(body: serde_json::Value) -> Self {
        Self {
            status: StatusCode::CREATED,
            body,
        }
    }
}

/// A resource handler with one method per HTTP verb.
pub trait ResourceHandler: Send + Sync {
    /// Name shown in logs and route listings.
    fn name(&self) -> &'static str;

    /// Verbs this handler implements; drives `Allow` headers.
    fn allowed_methods(&self) -> Vec<Method>;

    fn get(&self, _ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        Err(self.method_not_allowed())
    }

    fn post(&self, _ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        Err(self.method_not_allowed())
    }

    fn put(&self, _ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        Err(self.method_not_allowed())
    }

    fn patch(&self, _ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        Err(self.method_not_allowed())
    }

    fn delete(&self, _ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        Err(self.method_not_allowed())
    }

    fn method_not_allowed(&self) -> HandlerError {
        HandlerError::MethodNotAllowed {
            allowed: self.allowed_methods(),
        }
    }

    /// Route a request to the method for its verb. `HEAD` is served by `get`.
    fn dispatch(&self, method: &Method, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        match *method {
            Method::GET | Method::HEAD => self.get(ctx),
            Method::POST => self.post(ctx),
            Method::PUT => self.put(ctx),
            Method::PATCH => self.patch(ctx),
            Method::DELETE => self.delete(ctx),
            _ => Err(self.method_not_allowed()),
        }
    }
}

impl std::fmt::Debug for dyn ResourceHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ResourceHandler").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReadOnly;

    impl ResourceHandler for ReadOnly {
        fn name(&self) -> &'static str {
            "ReadOnly"
        }

        fn allowed_methods(&self) -> Vec<Method> {
            vec![Method::GET]
        }

        fn get(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
            Ok(HandlerResponse::ok(serde_json::json!({ "id": ctx.params.get_int("id") })))
        }
    }

    #[test]
    fn test_dispatch_by_method() {
        let handler = ReadOnly;
        let ctx = RequestContext::new(Params::new().with("id", 3u64));

        let res = handler.dispatch(&Method::GET, &ctx).unwrap();
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["id"], 3);

        assert!(handler.dispatch(&Method::HEAD, &ctx).is_ok());

        match handler.dispatch(&Method::POST, &ctx) {
            Err(HandlerError::MethodNotAllowed { allowed }) => assert_eq!(allowed, vec![Method::GET]),
            other => panic!("expected 405, got {:?}", other),
        }
        assert!(handler.dispatch(&Method::TRACE, &ctx).is_err());
    }

    #[test]
    fn test_context_helpers() {
        #[derive(serde::Deserialize)]
        struct Body {
            name: String,
        }

        let ctx = RequestContext::default()
            .with_query("name", "  acme ")
            .with_body(serde_json::json!({ "name": "acme" }));

        assert_eq!(ctx.required_query("name").unwrap(), "acme");
        assert!(ctx.required_query("missing").is_err());
        assert_eq!(ctx.json::<Body>().unwrap().name, "acme");

        let empty = RequestContext::default();
        assert!(matches!(empty.json::<Body>(), Err(HandlerError::BadRequest(_))));
    }
}
