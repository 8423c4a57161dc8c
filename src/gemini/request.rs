//! Gemini request parsing.
//!
//! A request is a single absolute URL followed by CRLF. The URL may be at
//! most 1024 bytes.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use url::Url;

/// Maximum URL length in bytes, excluding the CRLF terminator.
pub const MAX_REQUEST_LEN: usize = 1024;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("empty request")]
    Empty,

    #[error("request exceeds {MAX_REQUEST_LEN} bytes")]
    TooLong,

    #[error("request line is not terminated by CRLF")]
    Unterminated,

    #[error("request is not valid UTF-8")]
    NotUtf8,

    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("I/O error reading request: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiRequest {
    url: Url,
}

impl GeminiRequest {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Parse a raw request line, including its terminator.
    pub fn parse(line: &[u8]) -> Result<Self, RequestError> {
        let line = match line.strip_suffix(b"\r\n") {
            Some(line) => line,
            None if line.is_empty() => return Err(RequestError::Empty),
            None if line.len() > MAX_REQUEST_LEN => return Err(RequestError::TooLong),
            None => return Err(RequestError::Unterminated),
        };
        if line.is_empty() {
            return Err(RequestError::Empty);
        }
        if line.len() > MAX_REQUEST_LEN {
            return Err(RequestError::TooLong);
        }

        let text = std::str::from_utf8(line).map_err(|_| RequestError::NotUtf8)?;
        let url = Url::parse(text)?;
        Ok(Self { url })
    }

    /// Read one request line from `stream` and parse it.
    ///
    /// Reads at most `MAX_REQUEST_LEN + 2` bytes so an endless line cannot
    /// grow the buffer.
    pub async fn read_from<R>(stream: &mut R) -> Result<Self, RequestError>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(stream.take(MAX_REQUEST_LEN as u64 + 2));
        let mut line = Vec::with_capacity(128);
        reader.read_until(b'\n', &mut line).await?;
        Self::parse(&line)
    }
}
