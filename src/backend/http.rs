//! reqwest implementation of [`FlyerBackend`].
//!
//! Every call is a single JSON POST. A non-2xx status is a failure whose
//! detail is the response body text, so backend validation messages
//! ("pdf_b64 required") reach the user unchanged. No retries.

use super::wire::{FlyerRequest, FlyerResponse, PdfExtractRequest, PdfExtractResponse};
use super::{Endpoint, FlyerBackend};
use crate::config::ClientConfig;
use crate::error::FlyerError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Talks to a live backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    timeout_secs: u64,
}

impl HttpBackend {
    /// Build a backend client from the configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, FlyerError> {
        let base_url = config.parsed_base_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| FlyerError::Internal(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// Absolute URL of an endpoint, keeping any path prefix of the base URL.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, FlyerError> {
        let joined = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.path()
        );
        Url::parse(&joined).map_err(|e| FlyerError::Internal(format!("bad endpoint URL: {e}")))
    }

    async fn post<Req, Resp>(&self, endpoint: Endpoint, body: &Req) -> Result<Resp, FlyerError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint)?;
        let start = Instant::now();
        debug!("{} → {}", endpoint, url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} answered HTTP {}: {}", endpoint, status.as_u16(), body);
            return Err(FlyerError::Backend {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;
        debug!(
            "{} ← {} bytes in {}ms",
            endpoint,
            bytes.len(),
            start.elapsed().as_millis()
        );

        serde_json::from_slice(&bytes).map_err(|e| FlyerError::InvalidResponse {
            endpoint,
            detail: e.to_string(),
        })
    }

    fn transport_error(&self, endpoint: Endpoint, e: reqwest::Error) -> FlyerError {
        if e.is_timeout() {
            FlyerError::Timeout {
                endpoint,
                secs: self.timeout_secs,
            }
        } else {
            FlyerError::Request {
                endpoint,
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl FlyerBackend for HttpBackend {
    async fn extract_panels(
        &self,
        request: &PdfExtractRequest,
    ) -> Result<PdfExtractResponse, FlyerError> {
        self.post(Endpoint::PdfExtract, request).await
    }

    async fn compose_flyer(&self, request: &FlyerRequest) -> Result<FlyerResponse, FlyerError> {
        self.post(Endpoint::Flyer, request).await
    }
}
