//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use config_store::config::StoreConfig;
use config_store::http::HttpServer;
use config_store::lifecycle::Shutdown;
use config_store::store::ConfigStore;
use tokio::net::TcpListener;

/// A config store server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    #[allow(dead_code)]
    pub store: Arc<ConfigStore>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with default settings.
pub async fn start_server() -> TestServer {
    start_server_with(StoreConfig::default()).await
}

/// Start a server with the given settings; the port is always ephemeral.
#[allow(dead_code)]
pub async fn start_server_with(mut config: StoreConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.port = Some(addr.port());

    let store = Arc::new(ConfigStore::new());
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::clone(&store));
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, store, shutdown }
}

/// HTTP client that never goes through a proxy or reuses idle connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
