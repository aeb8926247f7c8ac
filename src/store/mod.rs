//! Remote store client
//!
//! This module provides the thin JSON client for the collection-oriented
//! HTTP API that owns all durable roster and training-record data. The
//! client is generic over the record type; the services layer picks the
//! collection and the payload.
//!
//! Mutations address records by their stable `id` (`PUT /{c}/{id}`,
//! `DELETE /{c}/{id}`). Failures are terminal: the caller re-invokes the
//! operation manually, there is no automatic retry.

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Collections
// ============================================================================

/// Remote collections exposed by the storage API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    TrainingRecords,
}

impl Collection {
    /// Collection name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::TrainingRecords => "trainingRecords",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for the remote store client
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Storage API root URL
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl StoreConfig {
    /// Create a new store config with default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("jiaxiao/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// ============================================================================
// Remote Store Client
// ============================================================================

/// Client for the collection-oriented storage API
#[derive(Debug, Clone)]
pub struct RemoteStoreClient {
    config: StoreConfig,
    http_client: Client,
}

impl RemoteStoreClient {
    /// Create a new store client
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| StoreError::Init(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch the full contents of a collection
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.collection_url(collection);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Append one record to a collection
    pub async fn create<T: Serialize>(
        &self,
        collection: Collection,
        record: &T,
    ) -> Result<(), StoreError> {
        let url = self.collection_url(collection);
        self.send_json(self.http_client.post(&url), record).await
    }

    /// Append a batch of records with a single request
    pub async fn create_many<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StoreError> {
        let url = self.collection_url(collection);
        self.send_json(self.http_client.post(&url), &records).await
    }

    /// Replace the record with the given id
    pub async fn update<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        record: &T,
    ) -> Result<(), StoreError> {
        let url = format!("{}/{id}", self.collection_url(collection));
        self.send_json(self.http_client.put(&url), record).await
    }

    /// Remove the record with the given id
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/{id}", self.collection_url(collection));

        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            collection.as_str()
        )
    }

    // Internal: send a JSON body, succeed on any 2xx
    async fn send_json<T: Serialize + ?Sized>(
        &self,
        request: reqwest::RequestBuilder,
        body: &T,
    ) -> Result<(), StoreError> {
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Http { status, message })
    }
}

// ============================================================================
// Client Errors
// ============================================================================

/// Errors from the remote store client
#[derive(Error, Debug)]
pub enum StoreError {
    /// Client initialization error
    #[error("client initialization failed: {0}")]
    Init(String),

    /// Transport-level failure (connect, timeout, TLS)
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// Undecodable response body
    #[error("response parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::new("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("jiaxiao/"));
    }

    #[test]
    fn test_store_config_builders() {
        let config = StoreConfig::new("http://localhost:8080")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test/1.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test/1.0");
    }

    #[test]
    fn test_collection_url_strips_trailing_slash() {
        let client = RemoteStoreClient::new(StoreConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(
            client.collection_url(Collection::Students),
            "http://localhost:8080/students"
        );
        assert_eq!(
            client.collection_url(Collection::TrainingRecords),
            "http://localhost:8080/trainingRecords"
        );
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Students.as_str(), "students");
        assert_eq!(Collection::TrainingRecords.as_str(), "trainingRecords");
    }
}
