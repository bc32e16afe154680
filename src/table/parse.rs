// src/table/parse.rs

use super::text::{cell_text, is_hidden};
use super::Table;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("table selector should parse"));

/// Upper bound on `rowspan` / `colspan`, so a bogus attribute can't blow up the grid.
const MAX_SPAN: usize = 1000;

#[derive(Debug, Clone)]
struct RawCell {
    text: String,
    header: bool,
    colspan: usize,
    rowspan: usize,
}

/// Parses every `<table>` in the document, in document order.
///
/// Nested tables appear as their own entries after their parent.
/// Tables hidden with `display: none`, and tables without any text, are skipped.
pub fn parse_tables(html: &str) -> Vec<Table> {
    let document = Html::parse_document(html);
    let tables: Vec<Table> = document
        .select(&TABLE)
        .filter(|t| !is_hidden(t.value()))
        .filter(|t| t.text().any(|s| !s.trim().is_empty()))
        .map(parse_table)
        .collect();
    debug!(count = tables.len(), "parsed tables");
    tables
}

fn parse_table(table: ElementRef<'_>) -> Table {
    let mut head = Vec::new();
    let mut body = Vec::new();
    let mut foot = Vec::new();

    for section in child_elements(table) {
        match section.value().name() {
            "thead" => head.extend(rows_of(section)),
            "tbody" => body.extend(rows_of(section)),
            "tfoot" => foot.extend(rows_of(section)),
            "tr" if !is_hidden(section.value()) => body.push(raw_row(section)),
            _ => {}
        }
    }

    // Without a <thead>, leading all-<th> rows are the header.
    if head.is_empty() {
        let n = body
            .iter()
            .take_while(|row: &&Vec<RawCell>| row.iter().all(|c| c.header))
            .count();
        head = body.drain(..n).collect();
    }

    let head = expand_spans(head);
    let mut rows = expand_spans(body);
    rows.extend(expand_spans(foot));

    let width = head
        .iter()
        .chain(rows.iter())
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    Table::new(column_labels(&head, width), rows)
}

fn child_elements<'a>(elem: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    elem.children().filter_map(ElementRef::wrap)
}

fn rows_of(section: ElementRef<'_>) -> Vec<Vec<RawCell>> {
    child_elements(section)
        .filter(|e| e.value().name() == "tr" && !is_hidden(e.value()))
        .map(raw_row)
        .collect()
}

fn raw_row(tr: ElementRef<'_>) -> Vec<RawCell> {
    child_elements(tr)
        .filter(|e| matches!(e.value().name(), "td" | "th") && !is_hidden(e.value()))
        .map(|cell| RawCell {
            header: cell.value().name() == "th",
            colspan: span(cell, "colspan"),
            rowspan: span(cell, "rowspan"),
            text: cell_text(cell),
        })
        .collect()
}

fn span(cell: ElementRef<'_>, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(MAX_SPAN))
}

/// Lays rows out on a grid, copying each spanning cell into every slot it covers.
fn expand_spans(rows: Vec<Vec<RawCell>>) -> Vec<Vec<String>> {
    // per column: text still owed to the rows below, and how many rows
    let mut pending: Vec<Option<(String, usize)>> = Vec::new();
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let mut texts = Vec::with_capacity(row.len());
        let mut cells = row.into_iter();
        let mut col = 0;

        loop {
            if let Some(text) = take_pending(&mut pending, col) {
                texts.push(text);
                col += 1;
                continue;
            }
            let Some(cell) = cells.next() else { break };
            for _ in 0..cell.colspan {
                // the new cell takes over any span still owed to this slot
                let owed = (cell.rowspan > 1).then(|| (cell.text.clone(), cell.rowspan - 1));
                if owed.is_some() && pending.len() <= col {
                    pending.resize(col + 1, None);
                }
                if let Some(slot) = pending.get_mut(col) {
                    *slot = owed;
                }
                texts.push(cell.text.clone());
                col += 1;
            }
        }

        // spans from above that sit right of this row's last cell
        if let Some(last) = pending.iter().rposition(Option::is_some) {
            while col <= last {
                texts.push(take_pending(&mut pending, col).unwrap_or_default());
                col += 1;
            }
        }

        out.push(texts);
    }
    out
}

fn take_pending(pending: &mut [Option<(String, usize)>], col: usize) -> Option<String> {
    let slot = pending.get_mut(col)?;
    let (text, left) = slot.take()?;
    if left > 1 {
        *slot = Some((text.clone(), left - 1));
    }
    Some(text)
}

/// One label per column. Stacked header rows are merged top to bottom,
/// skipping blanks and repeats; duplicates get `.1`, `.2`, ... suffixes.
fn column_labels(head: &[Vec<String>], width: usize) -> Vec<String> {
    let labels = (0..width)
        .map(|col| {
            if head.is_empty() {
                return col.to_string();
            }
            let mut parts: Vec<&str> = Vec::new();
            for row in head {
                if let Some(text) = row.get(col).filter(|t| !t.is_empty()) {
                    if parts.last() != Some(&text.as_str()) {
                        parts.push(text.as_str());
                    }
                }
            }
            if parts.is_empty() {
                format!("Unnamed: {col}")
            } else {
                parts.join(" ")
            }
        })
        .collect();
    dedupe_labels(labels)
}

fn dedupe_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    labels
        .into_iter()
        .map(|label| {
            let count = seen.entry(label.clone()).or_insert(0);
            let out = if *count == 0 {
                label
            } else {
                format!("{label}.{count}")
            };
            *count += 1;
            out
        })
        .collect()
}
