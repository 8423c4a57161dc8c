//! Gateway outcomes to Gemini responses.
//!
//! | Outcome                  | Status | Meta                              |
//! |--------------------------|--------|-----------------------------------|
//! | unsupported scheme       | 53     | `Scheme not supported: X`         |
//! | request build failure    | 43     | fixed message                     |
//! | connect/TLS failure      | 43     | fixed message                     |
//! | download abandoned       | 43     | timeout and URL                   |
//! | redirect                 | 30     | final URL                         |
//! | redirect URL over 1024 B | 43     | fixed message                     |
//! | HTTP 200                 | 20     | content type after transformation |
//! | HTTP 404                 | 51     | `Not found`                       |
//! | other HTTP status        | 50     | `Failure: HTTP status: X`         |
//! | conversion failure       | 42     | fixed message                     |

use crate::gemini::{GeminiResponse, Status};
use crate::proxy::error::GatewayError;
use crate::proxy::transform::Transformed;

/// Gemini status for a failed or short-circuited request.
pub fn status_for(err: &GatewayError) -> Status {
    match err {
        GatewayError::SchemeUnsupported { .. } => Status::ProxyRequestRefused,
        GatewayError::RequestConstruction(_)
        | GatewayError::RemoteUnreachable(_)
        | GatewayError::DownloadAbandoned { .. }
        | GatewayError::RedirectTooLong { .. } => Status::ProxyError,
        GatewayError::Redirected { .. } => Status::RedirectTemporary,
        GatewayError::Conversion(_) => Status::CgiError,
        GatewayError::UpstreamNotFound => Status::NotFound,
        GatewayError::UpstreamFailure { .. } => Status::PermanentFailure,
    }
}

/// Response for a request that did not end in a 20.
pub fn failure_response(err: &GatewayError) -> GeminiResponse {
    match err {
        GatewayError::Redirected { target } => GeminiResponse::redirect(target.as_str()),
        other => GeminiResponse::failure(status_for(other), other.to_string()),
    }
}

/// Response for a successful fetch.
pub fn success_response(content: Transformed) -> GeminiResponse {
    GeminiResponse::success(content.content_type, content.body)
}
