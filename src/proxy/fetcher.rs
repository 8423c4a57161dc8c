//! Bounded upstream HTTP fetch.
//!
//! # Responsibilities
//! - Build a dedicated client per fetch with connect and overall timeouts
//! - Issue a single GET, never retried
//! - Report the requested and final URL so redirects can be detected
//! - Read the whole body, distinguishing a stalled download from a
//!   failed connection
//!
//! # Design Decisions
//! - No client is shared between requests, so there is no connection pool
//!   to leak into or reuse across unrelated traffic
//! - Dropping the fetch future (or any value it returned) releases the
//!   socket; nothing outlives the call except the buffered body

use std::time::Duration;

use bytes::Bytes;
use hyper::ext::ReasonPhrase;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::GatewayConfig;

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The client or request could not be built.
    #[error("failed to build request: {0}")]
    RequestConstruction(#[source] reqwest::Error),

    /// Connect, TLS or protocol failure before a response arrived.
    #[error("remote host did not respond: {0}")]
    RemoteUnreachable(#[source] reqwest::Error),

    /// Headers arrived but the body did not finish in time.
    #[error("download of {url} abandoned: {source}")]
    DownloadAbandoned {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Timeouts and identity for outbound requests.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Bounds socket establishment and the TLS handshake.
    pub connect_timeout: Duration,
    /// Bounds the whole request, response and body read.
    pub download_timeout: Duration,
    /// Sent as `User-Agent` when present.
    pub user_agent: Option<String>,
}

impl From<&GatewayConfig> for FetchSettings {
    fn from(config: &GatewayConfig) -> Self {
        let agent = &config.http.user_agent;
        Self {
            connect_timeout: config.timeouts.connect(),
            download_timeout: config.timeouts.download(),
            user_agent: (!agent.is_empty()).then(|| agent.clone()),
        }
    }
}

/// Outcome of a completed fetch.
#[derive(Debug)]
pub struct FetchResult {
    requested_url: Url,
    final_url: Url,
    status: StatusCode,
    reason: Option<String>,
    content_type: Option<String>,
    body: Option<Bytes>,
}

impl FetchResult {
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    /// The upstream redirected us somewhere else.
    pub fn is_redirect(&self) -> bool {
        self.requested_url != self.final_url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// `"<code> <reason>"` as sent by the upstream, e.g.
    /// `"503 Down for maintenance"`. Falls back to the canonical reason.
    pub fn status_line(&self) -> String {
        match self.reason.as_deref().or(self.status.canonical_reason()) {
            Some(reason) => format!("{} {}", self.status.as_u16(), reason),
            None => self.status.as_u16().to_string(),
        }
    }

    /// The `Content-Type` header, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Present only for a 200 response that was not redirected.
    pub fn into_body(self) -> Option<Bytes> {
        self.body
    }
}

/// Performs one bounded GET per call.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn client(&self) -> Result<Client, FetchError> {
        Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.download_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .map_err(FetchError::RequestConstruction)
    }

    /// Fetch `url`.
    ///
    /// A redirected response is returned without reading its body.
    pub async fn fetch(&self, url: &Url) -> Result<FetchResult, FetchError> {
        let client = self.client()?;

        let mut builder = client.get(url.clone());
        if let Some(agent) = &self.settings.user_agent {
            builder = builder.header(USER_AGENT, agent);
        }
        let request = builder.build().map_err(FetchError::RequestConstruction)?;

        let response = client
            .execute(request)
            .await
            .map_err(FetchError::RemoteUnreachable)?;

        let status = response.status();
        // hyper records the phrase only when it differs from the canonical one
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned());
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

        let mut result = FetchResult {
            requested_url: url.clone(),
            final_url,
            status,
            reason,
            content_type,
            body: None,
        };

        if result.is_redirect() {
            debug!(from = %url, to = %result.final_url, "Redirect detected, body not read");
            return Ok(result);
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::DownloadAbandoned {
                url: result.final_url.to_string(),
                source,
            })?;

        debug!(url = %url, status = status.as_u16(), size = body.len(), "Download completed");

        if status == StatusCode::OK {
            result.body = Some(body);
        }
        Ok(result)
    }
}
