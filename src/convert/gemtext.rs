//! HTML to gemtext conversion.
//!
//! Gemtext is line oriented: text lines, `#` headings, `* ` list items,
//! `> ` quotes, fenced preformatted blocks and `=> url label` link lines.
//! Links cannot appear inline, so they are gathered while walking the
//! document and emitted as link lines every few paragraphs.

use scraper::{ElementRef, Html, Node};

use crate::convert::options::ConversionOptions;
use crate::convert::table::{render_grid, render_plain};
use crate::convert::{ConversionError, MarkupConverter};

/// Elements whose content never reaches the output.
const SKIPPED: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe", "object", "canvas",
];

/// Elements that end the current paragraph before and after their content.
const BLOCKS: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "nav", "aside", "form",
    "fieldset", "address", "figure", "figcaption", "center", "details", "summary", "dd", "dt",
];

/// Converter built on html5ever via `scraper`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GemtextConverter;

impl MarkupConverter for GemtextConverter {
    fn convert(&self, html: &str, options: &ConversionOptions) -> Result<String, ConversionError> {
        let document = Html::parse_document(html);
        let mut writer = Writer::new(options);
        writer.children(document.root_element(), 1)?;
        Ok(writer.finish())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Heading,
    ListItem,
    Quote,
    Preformatted,
    Row,
    Link,
}

struct Link {
    number: usize,
    url: String,
    label: String,
}

struct Writer<'o> {
    options: &'o ConversionOptions,
    out: String,
    last: Option<Kind>,
    inline: String,
    links: Vec<Link>,
    next_citation: usize,
    paragraphs: usize,
}

impl<'o> Writer<'o> {
    fn new(options: &'o ConversionOptions) -> Self {
        Self {
            options,
            out: String::new(),
            last: None,
            inline: String::new(),
            links: Vec::new(),
            next_citation: options.citation_start,
            paragraphs: 0,
        }
    }

    fn finish(mut self) -> String {
        self.flush(Kind::Text);
        self.emit_links();
        self.out
    }

    fn children(&mut self, element: ElementRef<'_>, depth: usize) -> Result<(), ConversionError> {
        if depth > self.options.max_depth {
            return Err(ConversionError::NestingTooDeep { limit: self.options.max_depth });
        }
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.element(child, depth + 1)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn element(&mut self, element: ElementRef<'_>, depth: usize) -> Result<(), ConversionError> {
        let name = element.value().name();
        if SKIPPED.contains(&name) {
            return Ok(());
        }

        match name {
            "br" => self.inline.push('\n'),
            "hr" => {
                self.flush(Kind::Text);
                self.emit(Kind::Text, "---");
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush(Kind::Text);
                self.children(element, depth)?;
                if self.flush(Kind::Heading) {
                    let marks = match name {
                        "h1" => "#",
                        "h2" => "##",
                        _ => "###",
                    };
                    self.prefix_last(marks);
                }
                self.end_paragraph();
            }
            "ul" | "ol" | "dl" | "menu" => {
                self.flush(Kind::Text);
                self.children(element, depth)?;
                self.flush(Kind::ListItem);
                self.end_paragraph();
            }
            "li" => {
                self.flush(Kind::ListItem);
                self.children(element, depth)?;
                self.flush(Kind::ListItem);
            }
            "blockquote" => {
                self.flush(Kind::Text);
                self.children(element, depth)?;
                self.flush(Kind::Quote);
                self.end_paragraph();
            }
            "pre" => {
                self.flush(Kind::Text);
                self.preformatted(element);
                self.end_paragraph();
            }
            "table" => {
                self.flush(Kind::Text);
                self.table(element);
                self.end_paragraph();
            }
            "a" => self.anchor(element, depth)?,
            "img" => self.image(element),
            _ if BLOCKS.contains(&name) => {
                self.flush(Kind::Text);
                self.children(element, depth)?;
                if self.flush(Kind::Text) {
                    self.end_paragraph();
                }
            }
            _ => self.children(element, depth)?,
        }
        Ok(())
    }

    fn anchor(&mut self, element: ElementRef<'_>, depth: usize) -> Result<(), ConversionError> {
        let start = self.inline.len();
        self.children(element, depth)?;

        let Some(href) = element.value().attr("href").and_then(usable_href) else {
            return Ok(());
        };
        let label = collapse(self.inline.get(start..).unwrap_or(""));
        let number = self.cite(href, label);
        if self.options.citation_markers {
            self.inline.push_str(&format!("[{number}]"));
        }
        Ok(())
    }

    fn image(&mut self, element: ElementRef<'_>) {
        if !self.options.emit_images_as_links {
            return;
        }
        let Some(src) = element.value().attr("src").and_then(usable_href) else {
            return;
        };
        let alt = collapse(element.value().attr("alt").unwrap_or(""));
        let label = if alt.is_empty() {
            "Image".to_string()
        } else {
            format!("Image: {alt}")
        };
        self.cite(src, label);
    }

    fn preformatted(&mut self, element: ElementRef<'_>) {
        let text: String = element.text().collect();
        let text = text.trim_matches('\n').trim_end();
        if text.is_empty() {
            return;
        }
        self.emit(Kind::Preformatted, &format!("```\n{text}\n```"));
    }

    fn table(&mut self, element: ElementRef<'_>) {
        let mut rows = Vec::new();
        for node in element.descendants() {
            let Some(row) = ElementRef::wrap(node) else { continue };
            if row.value().name() != "tr" {
                continue;
            }
            let cells: Vec<String> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(|cell| collapse(&cell.text().collect::<String>()))
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }

        if self.options.pretty_tables {
            let grid = render_grid(&rows, &self.options.table_style);
            if !grid.is_empty() {
                self.emit(Kind::Preformatted, &format!("```\n{}\n```", grid.join("\n")));
            }
        } else {
            for line in render_plain(&rows) {
                self.emit(Kind::Row, &line);
            }
        }

        for node in element.descendants() {
            let Some(anchor) = ElementRef::wrap(node) else { continue };
            if anchor.value().name() != "a" {
                continue;
            }
            if let Some(href) = anchor.value().attr("href").and_then(usable_href) {
                let label = collapse(&anchor.text().collect::<String>());
                self.cite(href, label);
            }
        }
    }

    fn cite(&mut self, url: &str, label: String) -> usize {
        let number = self.next_citation;
        self.next_citation += 1;
        self.links.push(Link { number, url: url.to_string(), label });
        number
    }

    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                if !self.inline.is_empty() && !self.inline.ends_with(char::is_whitespace) {
                    self.inline.push(' ');
                }
            } else {
                self.inline.push(c);
            }
        }
    }

    /// Emit the pending inline text as `kind`. Returns whether anything was
    /// written.
    fn flush(&mut self, kind: Kind) -> bool {
        let pending = std::mem::take(&mut self.inline);
        let lines: Vec<&str> = pending
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return false;
        }

        let text = match kind {
            Kind::ListItem => format!("* {}", lines.join(" ")),
            Kind::Heading => lines.join(" "),
            Kind::Quote => lines
                .iter()
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => lines.join("\n"),
        };
        self.emit(kind, &text);
        true
    }

    /// Put heading marks in front of the block just emitted, if it was a
    /// heading.
    fn prefix_last(&mut self, marks: &str) {
        if self.last != Some(Kind::Heading) {
            return;
        }
        let start = self.out.rfind('\n').map(|i| i + 1).unwrap_or(0);
        self.out.insert_str(start, &format!("{marks} "));
    }

    fn emit(&mut self, kind: Kind, text: &str) {
        if !self.out.is_empty() {
            let tight = self.last == Some(kind)
                && matches!(kind, Kind::ListItem | Kind::Link | Kind::Row);
            self.out.push_str(if tight { "\n" } else { "\n\n" });
        }
        self.out.push_str(text);
        self.last = Some(kind);
    }

    fn end_paragraph(&mut self) {
        self.paragraphs += 1;
        if self.paragraphs >= self.options.link_emit_frequency {
            self.emit_links();
        }
    }

    fn emit_links(&mut self) {
        self.paragraphs = 0;
        let numbered = self.options.numbered_links || self.options.citation_markers;
        for link in std::mem::take(&mut self.links) {
            let mut line = format!("=> {}", link.url);
            if numbered {
                line.push_str(&format!(" [{}]", link.number));
            }
            if !link.label.is_empty() {
                line.push(' ');
                line.push_str(&link.label);
            }
            self.emit(Kind::Link, &line);
        }
    }
}

/// Drop hrefs that lead nowhere outside the page.
fn usable_href(href: &str) -> Option<&str> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if href
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
    {
        return None;
    }
    Some(href)
}

/// Collapse runs of whitespace to single spaces and trim.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
