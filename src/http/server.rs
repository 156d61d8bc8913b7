//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatcher as its only handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a bound listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::handler::SharedHandler;
use crate::http::dispatch::{dispatch, AppState};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::routing::RouteTable;

/// HTTP server exposing a route table.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server over an already-built route table.
    pub fn new(config: ServerConfig, table: Arc<RouteTable<SharedHandler>>) -> Self {
        let state = AppState {
            table,
            routing: Arc::new(config.routing.clone()),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_prefix = %self.config.routing.mount_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organization::{url_patterns, OrganizationDirectory};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let table = url_patterns(Arc::new(OrganizationDirectory::new())).unwrap();
        HttpServer::new(ServerConfig::default(), Arc::new(table))
    }

    async fn send(router: Router, method: Method, uri: &str, body: Option<&str>) -> axum::response::Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_default())
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let server = server();

        let res = send(
            server.router(),
            Method::POST,
            "/organization/create-org/",
            Some(r#"{"name":"acme"}"#),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res.headers().contains_key("x-request-id"));
        let created = json(res).await;
        assert_eq!(created["id"], 1);

        let res = send(server.router(), Method::GET, "/organization/org/1/", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json(res).await["name"], "acme");
    }

    #[tokio::test]
    async fn test_unknown_and_mistyped_paths() {
        let server = server();

        let res = send(server.router(), Method::GET, "/organization/unknown-path/", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(json(res).await["error"].as_str().unwrap().contains("No route"));

        let res = send(server.router(), Method::GET, "/organization/org/abc/", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let server = server();
        let request = Request::builder()
            .uri("/organization/is-org/?name=x")
            .header("x-request-id", "fixed-id")
            .body(Body::empty())
            .unwrap();

        let res = server.router().oneshot(request).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["x-request-id"], "fixed-id");
    }

    #[tokio::test]
    async fn test_bad_json_and_oversized_body() {
        let server = server();

        let res = send(server.router(), Method::POST, "/organization/create-org/", Some("{nope")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let mut config = ServerConfig::default();
        config.limits.max_body_size = 8;
        let table = url_patterns(Arc::new(OrganizationDirectory::new())).unwrap();
        let small = HttpServer::new(config, Arc::new(table));

        let res = send(
            small.router(),
            Method::POST,
            "/organization/create-org/",
            Some(r#"{"name":"a very long organization name"}"#),
        )
        .await;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_options_and_method_not_allowed() {
        let server = server();

        let res = send(server.router(), Method::OPTIONS, "/organization/check-org/1/", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::ALLOW], "GET, HEAD, OPTIONS");

        let res = send(server.router(), Method::DELETE, "/organization/check-org/1/", None).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_append_slash_redirect() {
        let server = server();

        let res = send(server.router(), Method::GET, "/organization/get-org-id?name=acme", None).await;
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            res.headers()[header::LOCATION],
            "/organization/get-org-id/?name=acme"
        );
    }
}
