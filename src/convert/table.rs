//! Plain-text table rendering.
//!
//! Column widths are measured in chars, so wide glyphs and combining marks
//! can still throw the alignment off.

use crate::convert::options::TableStyle;

/// Render rows as an aligned grid. Short rows simply end early.
pub fn render_grid(rows: &[Vec<String>], style: &TableStyle) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let rule = rule_line(&widths, style);
    let mut lines = Vec::with_capacity(rows.len() * 2);
    for (index, row) in rows.iter().enumerate() {
        if index > 0 && style.row_line && !(index == 1 && style.header_line) {
            lines.push(rule.clone());
        }
        lines.push(row_line(row, &widths, style));
        if index == 0 && style.header_line && rows.len() > 1 {
            lines.push(rule.clone());
        }
    }
    lines
}

/// Render rows one per line, cells separated by a single space.
pub fn render_plain(rows: &[Vec<String>]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.iter()
                .filter(|cell| !cell.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn row_line(row: &[String], widths: &[usize], style: &TableStyle) -> String {
    let separator = format!(" {} ", style.column_separator);
    let cells: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - cell.chars().count();
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    cells.join(&separator).trim_end().to_string()
}

fn rule_line(widths: &[usize], style: &TableStyle) -> String {
    let junction = format!(
        "{}{}{}",
        style.row_separator, style.center_separator, style.row_separator
    );
    widths
        .iter()
        .map(|width| style.row_separator.to_string().repeat(*width))
        .collect::<Vec<_>>()
        .join(&junction)
}
