//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use org_routes::config::ServerConfig;
use org_routes::http::HttpServer;
use org_routes::lifecycle::Shutdown;
use org_routes::organization::{url_patterns, OrganizationDirectory};
use tokio::net::TcpListener;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub directory: Arc<OrganizationDirectory>,
}

impl TestServer {
    /// Absolute URL for `path` (which must start with '/').
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the organization service with `config` on 127.0.0.1:0.
pub async fn start_server(mut config: ServerConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let directory = Arc::new(OrganizationDirectory::new());
    let table = Arc::new(url_patterns(directory.clone()).unwrap());

    // Bound before spawning so connections queue until the server polls
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, table);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        shutdown,
        directory,
    }
}

/// Client that neither pools connections nor follows redirects.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
