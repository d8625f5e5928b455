//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own data directory.

use super::constants::*;
use super::fixtures::{create_empty_data_dir, create_test_data_dir};
use emotion_survey_server::catalog::Catalog;
use emotion_survey_server::playback::PlaybackStateStore;
use emotion_survey_server::response_log::ResponseLog;
use emotion_survey_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated data directory
///
/// When dropped, the server gracefully shuts down and temp resources are
/// cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Data directory, for direct file inspection in tests
    pub data_dir: PathBuf,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server with the five-song catalog on a random port.
    pub async fn spawn() -> Self {
        let (temp_dir, data_dir, songs_path) =
            create_test_data_dir().expect("Failed to create test data dir");
        Self::spawn_with(temp_dir, data_dir, Some(songs_path)).await
    }

    /// Spawns a test server with no songs at all.
    pub async fn spawn_empty_catalog() -> Self {
        let (temp_dir, data_dir) =
            create_empty_data_dir().expect("Failed to create test data dir");
        Self::spawn_with(temp_dir, data_dir, None).await
    }

    async fn spawn_with(temp_dir: TempDir, data_dir: PathBuf, songs_path: Option<PathBuf>) -> Self {
        let catalog = match songs_path {
            Some(path) => Catalog::load(path),
            None => Catalog::new(Vec::new()),
        };
        let playback = Arc::new(PlaybackStateStore::initialize(data_dir.join("state.json")));
        let response_log = Arc::new(ResponseLog::initialize(data_dir.join("responses.csv")));

        // Bind to random port
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
        let app = make_app(config, Arc::new(catalog), playback, response_log);

        // Spawn server in background task with graceful shutdown
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
            data_dir,
            _temp_dir: temp_dir,
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

        loop {
            if let Ok(response) = client.get(&self.base_url).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            if start.elapsed() > timeout {
                panic!("Server did not become ready within {:?}", timeout);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}
