//! Remote client for the rover photo API
//!
//! This module provides the transport seam the aggregation service is generic
//! over, and its production implementation on top of `reqwest`.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: URL building and the single request primitive with rate limiting
//! - `observer`: pluggable observability hook for request/response/error events

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{TransportError, TransportResult};

pub mod config;
pub mod http;
pub mod observer;

#[doc(hidden)]
pub mod testing;

pub use config::ClientConfig;
pub use observer::{FetchEvent, FetchObserver, NoopObserver, TracingObserver};

use http::HttpHandler;

/// Query pairs appended to a request after the credential
pub type Query = [(&'static str, String)];

/// Executes GET requests against the upstream API and returns parsed JSON
///
/// Implementations must not retry; they fail with `TransportError` on network
/// failure, non-success status, or malformed payload.
pub trait Transport: Send + Sync {
    fn get_json(
        &self,
        path: &str,
        query: &Query,
    ) -> impl Future<Output = TransportResult<Value>> + Send;

    /// Route the transport's own request/response/failure events to `observer`
    ///
    /// Transports that emit no events ignore it.
    fn attach_observer(&mut self, _observer: Arc<dyn FetchObserver>) {}
}

/// HTTP client for the rover photo API
///
/// Appends the shared credential to every request and reports each request,
/// response and failure to the configured observer.
#[derive(Debug)]
pub struct RoverClient {
    http_handler: HttpHandler,
    config: ClientConfig,
    observer: Arc<dyn FetchObserver>,
}

impl RoverClient {
    /// Creates a new RoverClient with default configuration
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if HTTP client creation fails
    pub fn new() -> TransportResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new RoverClient with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if HTTP client creation fails
    pub fn with_config(config: ClientConfig) -> TransportResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps)?;

        tracing::info!("Created rover photo client for {}", config.base_url);

        Ok(Self {
            http_handler,
            config,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the observer receiving request/response/error events
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.attach_observer(observer);
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn fetch(&self, path: &str, query: &Query) -> TransportResult<Value> {
        self.observer.on_event(&FetchEvent::Request {
            path: path.to_string(),
            params: query
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        });

        let result = match http::build_url(&self.config.base_url, path, &self.config.api_key, query)
        {
            Ok(url) => self.http_handler.get_json(&url).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(value) => self.observer.on_event(&FetchEvent::Response {
                path: path.to_string(),
                item_count: item_count(value),
            }),
            Err(e) => self.observer.on_event(&FetchEvent::Failure {
                path: path.to_string(),
                status: status_of(e),
                message: e.to_string(),
            }),
        }

        result
    }
}

impl Transport for RoverClient {
    async fn get_json(&self, path: &str, query: &Query) -> TransportResult<Value> {
        self.fetch(path, query).await
    }

    fn attach_observer(&mut self, observer: Arc<dyn FetchObserver>) {
        self.observer = observer;
    }
}

/// Number of photos carried by a response, for diagnostics
pub fn item_count(value: &Value) -> usize {
    ["photos", "latest_photos"]
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_array))
        .map_or(0, Vec::len)
}

fn status_of(error: &TransportError) -> Option<u16> {
    match error {
        TransportError::Status { status, .. } => Some(*status),
        TransportError::RateLimited => Some(429),
        TransportError::Http(e) => e.status().map(|s| s.as_u16()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::service::PhotoService;
    use serde_json::json;
    use testing::RecordingObserver;

    #[test]
    fn test_client_creation() {
        let client = RoverClient::new().unwrap();
        assert_eq!(client.config().api_key, crate::constants::DEMO_API_KEY);
    }

    #[test]
    fn test_client_creation_with_zero_rate_fails() {
        let config = ClientConfig {
            rate_limit_rps: 0,
            ..Default::default()
        };
        assert!(RoverClient::with_config(config).is_err());
    }

    #[test]
    fn test_item_count() {
        assert_eq!(item_count(&json!({"photos": [1, 2, 3]})), 3);
        assert_eq!(item_count(&json!({"latest_photos": [1]})), 1);
        assert_eq!(item_count(&json!({"rover": {}})), 0);
    }

    #[test]
    fn test_status_of() {
        assert_eq!(status_of(&TransportError::RateLimited), Some(429));
        assert_eq!(
            status_of(&TransportError::Timeout {
                path: "/rovers/spirit".to_string(),
                millis: 10
            }),
            None
        );
    }

    #[tokio::test]
    async fn test_service_observer_receives_client_events() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        let observer = Arc::new(RecordingObserver::default());
        let service = PhotoService::new(RoverClient::with_config(config).unwrap())
            .with_observer(observer.clone());

        let err = service.get_rover_info("curiosity").await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl { .. }));

        let events = observer.events();
        assert!(events
            .iter()
            .any(|e| matches!(e, FetchEvent::Request { path, .. } if path == "/rovers/curiosity")));
        assert!(events.iter().any(|e| matches!(
            e,
            FetchEvent::Failure { path, status: None, .. } if path == "/rovers/curiosity"
        )));
    }
}
