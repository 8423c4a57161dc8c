//! Pass-through or conversion of fetched content.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use url::Url;

use crate::config::ConversionConfig;
use crate::convert::{ConversionError, ConversionOptions, MarkupConverter};
use crate::gemini::response::GEMTEXT_MIME;

const FOOTER_RULE: &str = "──────────────────── ◆ ──────────────────── ◆ ────────────────────";
const FOOTER_NOTICE: &str = "Web page filtered and simplified by Gemini Web Gateway. \
To view the original content, open the page in your system web browser.";

/// Whether a `Content-Type` value denotes HTML.
///
/// A plain substring test: parameters are not parsed, so
/// `text/html; charset=utf-8` matches, `application/xhtml+xml` does not,
/// and any type that merely contains `text/html` does.
pub fn is_html(content_type: &str) -> bool {
    content_type.contains("text/html")
}

/// The notice appended to every converted page.
pub fn footer(source: &Url) -> String {
    format!("\n\n{FOOTER_RULE}\n\n{FOOTER_NOTICE}\n=> {source} Source page\n")
}

/// Body and content type ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub body: Bytes,
    pub content_type: String,
}

/// Decides between pass-through and conversion for a 200 response.
#[derive(Clone)]
pub struct ContentTransformer {
    converter: Arc<dyn MarkupConverter>,
    options: ConversionOptions,
    unfiltered: bool,
}

impl ContentTransformer {
    pub fn new(config: &ConversionConfig, converter: Arc<dyn MarkupConverter>) -> Self {
        Self {
            converter,
            options: ConversionOptions::from(config),
            unfiltered: config.unfiltered,
        }
    }

    pub fn should_convert(&self, content_type: &str) -> bool {
        !self.unfiltered && is_html(content_type)
    }

    /// Convert HTML to gemtext with a footer linking `source`, or return
    /// the input untouched.
    pub fn transform(
        &self,
        body: Bytes,
        content_type: &str,
        source: &Url,
    ) -> Result<Transformed, ConversionError> {
        if !self.should_convert(content_type) {
            return Ok(Transformed {
                body,
                content_type: content_type.to_string(),
            });
        }

        info!(url = %source, "Converting to text/gemini");

        let html = String::from_utf8_lossy(&body);
        let mut gemtext = self.converter.convert(&html, &self.options)?;
        gemtext.push_str(&footer(source));

        Ok(Transformed {
            body: Bytes::from(gemtext),
            content_type: GEMTEXT_MIME.to_string(),
        })
    }
}

impl std::fmt::Debug for ContentTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTransformer")
            .field("options", &self.options)
            .field("unfiltered", &self.unfiltered)
            .finish_non_exhaustive()
    }
}
