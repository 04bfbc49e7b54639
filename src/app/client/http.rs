//! Core HTTP operations with rate limiting
//!
//! This module provides the single request primitive of the remote client:
//! build the URL with the shared credential, pace the request through the rate
//! limiter, send it, and map the outcome onto [`TransportError`]. Nothing is
//! retried here; retry and fallback policy belong to the caller.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::constants::api;
use crate::errors::{TransportError, TransportResult};

/// HTTP operations handler with request pacing
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` if the rate limit is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> TransportResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Builds the rate limiter with the specified rate limit
    fn build_rate_limiter(
        rate_limit_rps: u32,
    ) -> TransportResult<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>> {
        let quota = Quota::per_second(NonZeroU32::new(rate_limit_rps).ok_or_else(|| {
            TransportError::InvalidUrl {
                url: String::new(),
                error: "Rate limit must be non-zero".to_string(),
            }
        })?);
        Ok(RateLimiter::direct(quota))
    }

    /// Fetches a JSON document
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on network failure, non-success status, or a body
    /// that is not JSON
    pub async fn get_json(&self, url: &Url) -> TransportResult<Value> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: upstream_error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| TransportError::MalformedPayload {
            path: url.path().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Builds `base_url + path` with the credential and query pairs appended
///
/// The base URL carries a path prefix (`/mars-photos/api/v1`), so the request
/// path is concatenated rather than resolved with `Url::join`.
pub fn build_url(
    base_url: &str,
    path: &str,
    api_key: &str,
    query: &[(&'static str, String)],
) -> TransportResult<Url> {
    let raw = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&raw).map_err(|e| TransportError::InvalidUrl {
        url: raw.clone(),
        error: e.to_string(),
    })?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair(api::API_KEY_PARAM, api_key);
        for (name, value) in query {
            pairs.append_pair(name, value);
        }
    }

    Ok(url)
}

/// Extracts `error.message` from an upstream error body, if present
fn upstream_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.pointer("/errors"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
