//! # HTTP Client Utilities
//!
//! Thin reqwest wrapper used by vehicle-data providers: a fixed request
//! timeout, JSON decoding, and mapping of transport and status failures onto
//! [`ProviderError`].

use crate::infrastructure::vehicle_data::error::{ProviderError, ProviderResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for provider adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ProviderError::internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request with query parameters and deserializes the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Timeout` or `ProviderError::Connection` if the
    /// request fails, `ProviderError::HttpStatus` on a non-2xx answer and
    /// `ProviderError::InvalidResponse` if the body cannot be parsed.
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ProviderResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json::<T>().await.map_err(|e| {
                ProviderError::invalid_response(format!("failed to parse response: {e}"))
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(map_status_error(status, &body))
        }
    }

    /// Maps a reqwest error to a `ProviderError`.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout_with_duration("request timed out", self.timeout_ms)
        } else if error.is_connect() {
            ProviderError::connection(format!("connection failed: {error}"))
        } else if error.is_decode() {
            ProviderError::invalid_response(format!("failed to decode body: {error}"))
        } else {
            ProviderError::connection(format!("HTTP request failed: {error}"))
        }
    }
}

/// Maps an HTTP status code to a `ProviderError`.
fn map_status_error(status: StatusCode, body: &str) -> ProviderError {
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    } else {
        body.to_string()
    };
    ProviderError::http_status(status.as_u16(), message)
}
