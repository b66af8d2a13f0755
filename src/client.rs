//! Statistics API client
//!
//! HTTP client for the record / list / reset endpoints.

use std::time::Duration;

use axum::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::export::DownloadLog;
use crate::models::{DownloadEvent, MessageResponse, NewDownload, RecordDownloadResponse};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Statistics API client
pub struct StatsClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl StatsClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Record one completed export
    pub async fn record_download(&self, data: &NewDownload) -> Result<DownloadEvent, ClientError> {
        let response = self.http_client
            .post(self.url("record-download"))
            .json(data)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let body: RecordDownloadResponse = Self::parse(response).await?;
        body.data
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Parse("record response carried no row".to_string()))
    }

    /// All recorded downloads, newest first
    pub async fn fetch_statistics(&self) -> Result<Vec<DownloadEvent>, ClientError> {
        let response = self.http_client
            .get(self.url("get-statistics"))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::parse(response).await
    }

    /// Clear the download history. Returns the server's acknowledgment.
    pub async fn reset_statistics(&self) -> Result<String, ClientError> {
        let response = self.http_client
            .post(self.url("reset-statistics"))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let body: MessageResponse = Self::parse(response).await?;
        Ok(body.message)
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return response.json().await
                .map_err(|e| ClientError::Parse(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or(text);

        Err(ClientError::Server { status: status.as_u16(), message })
    }
}

#[async_trait]
impl DownloadLog for StatsClient {
    async fn record(&self, data: &NewDownload) -> Result<(), ClientError> {
        self.record_download(data).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::{Config, ConfigError};
    use crate::store::MemoryStore;
    use crate::{create_router, AppState};

    async fn spawn_server(store: Arc<MemoryStore>) -> String {
        let config = Config {
            port: 0,
            storage: Err(ConfigError::StorageMissing("STORAGE_URL")),
            admin_password: None,
            environment: "test".to_string(),
        };
        let app = create_router(AppState::new(store, config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String) -> StatsClient {
        StatsClient::new(ClientConfig { base_url, timeout_seconds: 5 }).unwrap()
    }

    #[test]
    fn test_url_building() {
        let c = client("http://stats.local/".to_string());
        assert_eq!(c.url("get-statistics"), "http://stats.local/api/get-statistics");
    }

    #[tokio::test]
    async fn test_record_fetch_reset_round() {
        let store = Arc::new(MemoryStore::new());
        let c = client(spawn_server(store.clone()).await);

        let recorded = c
            .record_download(&NewDownload {
                certificate_type: "excellence".to_string(),
                file_format: "pdf".to_string(),
                student_name: "Sara".to_string(),
                school_name: "Future School".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(recorded.student_name, "Sara");

        let history = c.fetch_statistics().await.unwrap();
        assert_eq!(history, vec![recorded]);

        let message = c.reset_statistics().await.unwrap();
        assert_eq!(message, "History reset successfully");
        assert!(c.fetch_statistics().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let config = Config {
            port: 0,
            storage: Err(ConfigError::StorageMissing("STORAGE_URL")),
            admin_password: None,
            environment: "test".to_string(),
        };
        let state = AppState::unconfigured(ConfigError::StorageMissing("STORAGE_URL"), config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });

        let err = client(format!("http://{}", addr)).fetch_statistics().await.unwrap_err();
        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("STORAGE_URL"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}", addr)).fetch_statistics().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
