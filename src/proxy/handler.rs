//! Per-request orchestration.
//!
//! ```text
//! Received → SchemeChecked → Fetching → {Redirected | Fetched | FetchFailed}
//!          → {Converting | PassThrough} → Responded
//! ```
//!
//! Every branch ends in a `GeminiResponse`; nothing loops back and nothing
//! is retried.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::info;
use url::Url;

use crate::config::GatewayConfig;
use crate::convert::{GemtextConverter, MarkupConverter};
use crate::gemini::response::MAX_META_LEN;
use crate::gemini::{GeminiRequest, GeminiResponse};
use crate::proxy::error::GatewayError;
use crate::proxy::fetcher::{FetchSettings, HttpFetcher};
use crate::proxy::mapper::{failure_response, success_response};
use crate::proxy::transform::ContentTransformer;

/// The upstream target of one Gemini request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    url: Url,
}

impl ProxyRequest {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn is_http(&self) -> bool {
        matches!(self.scheme(), "http" | "https")
    }
}

impl From<&GeminiRequest> for ProxyRequest {
    fn from(request: &GeminiRequest) -> Self {
        Self { url: request.url().clone() }
    }
}

/// Turns Gemini requests into upstream fetches and back.
///
/// Holds only immutable state, so one instance is shared by every
/// connection task.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    fetcher: HttpFetcher,
    transformer: ContentTransformer,
    download_secs: u64,
}

impl RequestHandler {
    /// Handler using the built-in gemtext converter.
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_converter(config, Arc::new(GemtextConverter))
    }

    pub fn with_converter(config: &GatewayConfig, converter: Arc<dyn MarkupConverter>) -> Self {
        Self {
            fetcher: HttpFetcher::new(FetchSettings::from(config)),
            transformer: ContentTransformer::new(&config.conversion, converter),
            download_secs: config.timeouts.download_secs,
        }
    }

    /// Produce the response for `request`. Never fails.
    pub async fn handle(&self, request: &GeminiRequest) -> GeminiResponse {
        let request = ProxyRequest::from(request);
        match self.proxy(&request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(url = %request.url(), error = ?err, "Request ended without content");
                failure_response(&err)
            }
        }
    }

    async fn proxy(&self, request: &ProxyRequest) -> Result<GeminiResponse, GatewayError> {
        if !request.is_http() {
            return Err(GatewayError::SchemeUnsupported {
                scheme: request.scheme().to_string(),
            });
        }

        let url = request.url();
        info!(url = %url, "Retrieve");

        let fetched = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|err| GatewayError::from_fetch(err, self.download_secs))?;

        if fetched.is_redirect() {
            let target = fetched.final_url().as_str();
            info!(url = %url, target = %target, "Redirected");
            if target.len() > MAX_META_LEN {
                return Err(GatewayError::RedirectTooLong { length: target.len() });
            }
            return Err(GatewayError::Redirected {
                target: target.to_string(),
            });
        }

        match fetched.status() {
            StatusCode::OK => {
                let content_type = fetched.content_type().unwrap_or_default().to_string();
                info!(url = %url, content_type = %content_type, "Content-Type");

                let body = fetched.into_body().unwrap_or_default();
                let content = self.transformer.transform(body, &content_type, url)?;
                Ok(success_response(content))
            }
            StatusCode::NOT_FOUND => Err(GatewayError::UpstreamNotFound),
            _ => Err(GatewayError::UpstreamFailure {
                status_line: fetched.status_line(),
            }),
        }
    }
}
