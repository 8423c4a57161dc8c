//! Request-scoped failures of the gateway pipeline.

use thiserror::Error;

use crate::convert::ConversionError;
use crate::proxy::fetcher::FetchError;

/// Everything that stops a request short of a 20 response.
///
/// Each variant maps to exactly one Gemini status (see `mapper`). A
/// redirect is not a failure from the client's point of view, but it ends
/// the pipeline the same way.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Scheme not supported: {scheme}")]
    SchemeUnsupported { scheme: String },

    #[error("Could not connect to remote HTTP host")]
    RequestConstruction(#[source] reqwest::Error),

    #[error("Remote host did not respond with valid HTTP")]
    RemoteUnreachable(#[source] reqwest::Error),

    #[error("Download abandoned after {timeout_secs} seconds: {url}")]
    DownloadAbandoned {
        timeout_secs: u64,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Redirected to {target}")]
    Redirected { target: String },

    #[error("Redirect target too long ({length} bytes)")]
    RedirectTooLong { length: usize },

    #[error("HTML to GMI conversion failure")]
    Conversion(#[from] ConversionError),

    #[error("Not found")]
    UpstreamNotFound,

    #[error("Failure: HTTP status: {status_line}")]
    UpstreamFailure { status_line: String },
}

impl GatewayError {
    /// Attach the configured download timeout to a fetch failure.
    pub fn from_fetch(err: FetchError, download_secs: u64) -> Self {
        match err {
            FetchError::RequestConstruction(e) => Self::RequestConstruction(e),
            FetchError::RemoteUnreachable(e) => Self::RemoteUnreachable(e),
            FetchError::DownloadAbandoned { url, source } => Self::DownloadAbandoned {
                timeout_secs: download_secs,
                url,
                source,
            },
        }
    }
}
