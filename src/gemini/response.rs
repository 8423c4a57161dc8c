//! Gemini responses.
//!
//! # Responsibilities
//! - Enumerate Gemini status codes
//! - Enforce the response invariants: body present iff status is 20,
//!   meta always non-empty and free of line breaks
//! - Serialise the `<status> <meta>\r\n` header and body onto a stream

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Maximum meta length in bytes.
pub const MAX_META_LEN: usize = 1024;

/// MIME type of gemtext documents.
pub const GEMTEXT_MIME: &str = "text/gemini";

/// Gemini status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    Input = 10,
    SensitiveInput = 11,
    Success = 20,
    RedirectTemporary = 30,
    RedirectPermanent = 31,
    TemporaryFailure = 40,
    ServerUnavailable = 41,
    CgiError = 42,
    ProxyError = 43,
    SlowDown = 44,
    PermanentFailure = 50,
    NotFound = 51,
    Gone = 52,
    ProxyRequestRefused = 53,
    BadRequest = 59,
    ClientCertificateRequired = 60,
    CertificateNotAuthorised = 61,
    CertificateNotValid = 62,
}

/// First digit of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Input,
    Success,
    Redirect,
    TemporaryFailure,
    PermanentFailure,
    ClientCertificate,
}

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn category(self) -> StatusCategory {
        match self.code() / 10 {
            1 => StatusCategory::Input,
            2 => StatusCategory::Success,
            3 => StatusCategory::Redirect,
            4 => StatusCategory::TemporaryFailure,
            5 => StatusCategory::PermanentFailure,
            _ => StatusCategory::ClientCertificate,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        use Status::*;
        let status = match code {
            10 => Input,
            11 => SensitiveInput,
            20 => Success,
            30 => RedirectTemporary,
            31 => RedirectPermanent,
            40 => TemporaryFailure,
            41 => ServerUnavailable,
            42 => CgiError,
            43 => ProxyError,
            44 => SlowDown,
            50 => PermanentFailure,
            51 => NotFound,
            52 => Gone,
            53 => ProxyRequestRefused,
            59 => BadRequest,
            60 => ClientCertificateRequired,
            61 => CertificateNotAuthorised,
            62 => CertificateNotValid,
            _ => return None,
        };
        Some(status)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Response body. Owned bytes handed over to the transport, which consumes
/// it when writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body(Bytes);

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self(Bytes::from(text))
    }
}

/// A complete Gemini response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiResponse {
    status: Status,
    meta: String,
    body: Option<Body>,
}

impl GeminiResponse {
    /// A 20 response. An empty MIME type falls back to
    /// `application/octet-stream` so meta is never empty.
    pub fn success(mime: impl Into<String>, body: impl Into<Body>) -> Self {
        let mut mime = sanitize_meta(mime.into());
        if mime.is_empty() {
            mime = "application/octet-stream".to_string();
        }
        Self {
            status: Status::Success,
            meta: mime,
            body: Some(body.into()),
        }
    }

    /// A 30 redirect to `target`, which must fit in `MAX_META_LEN`.
    pub fn redirect(target: impl Into<String>) -> Self {
        Self::without_body(Status::RedirectTemporary, target.into())
    }

    /// Any non-success status with a human-readable message.
    pub fn failure(status: Status, message: impl Into<String>) -> Self {
        debug_assert!(status != Status::Success, "failure() called with status 20");
        Self::without_body(status, message.into())
    }

    fn without_body(status: Status, meta: String) -> Self {
        let mut meta = sanitize_meta(meta);
        if meta.is_empty() {
            meta = status.to_string();
        }
        Self { status, meta, body: None }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn meta(&self) -> &str {
        &self.meta
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// `<status> <meta>\r\n`
    pub fn header(&self) -> String {
        format!("{} {}\r\n", self.status.code(), self.meta)
    }

    /// Write header and body, consuming the response.
    pub async fn write_to<W>(self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(self.header().as_bytes()).await?;
        if let Some(body) = self.body {
            writer.write_all(body.as_bytes()).await?;
        }
        writer.flush().await
    }
}

/// Replace line breaks and cap the length on a char boundary.
fn sanitize_meta(meta: String) -> String {
    let mut meta: String = meta
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    if meta.len() > MAX_META_LEN {
        let mut end = MAX_META_LEN;
        while !meta.is_char_boundary(end) {
            end -= 1;
        }
        meta.truncate(end);
    }
    meta.trim().to_string()
}
