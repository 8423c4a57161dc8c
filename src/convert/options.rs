//! Conversion options.

use crate::config::ConversionConfig;

/// Deepest element nesting the converter will walk.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Layout of pretty-printed tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStyle {
    /// Draw a line under the first row.
    pub header_line: bool,
    /// Draw a line between rows.
    pub row_line: bool,
    /// Where row lines cross column separators.
    pub center_separator: char,
    /// Between cells of a row.
    pub column_separator: char,
    /// Fill character of row lines.
    pub row_separator: char,
}

impl TableStyle {
    /// Invisible grid: rows are still separated, but every separator is a
    /// space, so misaligned columns stay readable.
    pub fn invisible() -> Self {
        Self {
            header_line: false,
            row_line: true,
            center_separator: ' ',
            column_separator: ' ',
            row_separator: ' ',
        }
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_line: true,
            row_line: false,
            center_separator: '+',
            column_separator: '|',
            row_separator: '-',
        }
    }
}

/// Everything the converter needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    pub pretty_tables: bool,
    pub citation_start: usize,
    pub citation_markers: bool,
    pub numbered_links: bool,
    pub emit_images_as_links: bool,
    pub link_emit_frequency: usize,
    pub table_style: TableStyle,
    pub max_depth: usize,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::from(&ConversionConfig::default())
    }
}

impl From<&ConversionConfig> for ConversionOptions {
    fn from(config: &ConversionConfig) -> Self {
        Self {
            pretty_tables: config.pretty_tables,
            citation_start: config.citation_start.max(1),
            citation_markers: config.citation_markers,
            numbered_links: config.numbered_links,
            emit_images_as_links: config.emit_images_as_links,
            link_emit_frequency: config.link_emit_frequency.max(1),
            table_style: TableStyle::invisible(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
