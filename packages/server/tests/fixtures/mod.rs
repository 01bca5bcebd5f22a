//! Test fixtures for integration tests.

use std::time::Duration;

use terakoya_server::ui::{ServerConfig, run};

/// A server instance running in the background of the test runtime.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Spawn the server on the given port and wait until it accepts
    /// connections.
    pub async fn start(port: u16) -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
        };
        tokio::spawn(async move {
            if let Err(e) = run(config).await {
                eprintln!("test server error: {e}");
            }
        });

        let server = Self { port };
        server.wait_ready().await;
        server
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    async fn wait_ready(&self) {
        for _ in 0..100 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("server did not become ready on port {}", self.port);
    }
}
