//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own budget database on a
//! random port. Dropping the server shuts it down and cleans up the
//! temporary database directory.

use gigboard_booking_server::budget_store::SqliteBudgetStore;
use gigboard_booking_server::config::default_budget_table;
use gigboard_booking_server::engine::AffordabilityEngine;
use gigboard_booking_server::normalizer::FieldMapping;
use gigboard_booking_server::server::server::make_app;
use gigboard_booking_server::server::{RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, with the default budget
    /// table seeded into a fresh temporary database.
    pub async fn spawn() -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp db dir");
        let budget_store = Arc::new(
            SqliteBudgetStore::new(
                temp_db_dir.path().join("budgets.db"),
                &default_budget_table(),
            )
            .expect("Failed to create budget store"),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            frontend_dir_path: None,
        };

        let app = make_app(
            config,
            AffordabilityEngine::default(),
            FieldMapping::sheet_default(),
            budget_store,
        )
        .expect("Failed to build app");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the stats endpoint.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        while start.elapsed() < timeout {
            if let Ok(response) = client.get(&self.base_url).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Server did not become ready within {:?}", timeout);
    }
}
