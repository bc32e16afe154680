// src/table/text.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{node::Element, ElementRef, Node};

/// Line breaks, or any run of two or more whitespace characters.
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n]+|\s{2,}").expect("whitespace pattern should compile"));

/// Visible text of a cell, whitespace-normalized.
pub fn cell_text(cell: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(cell, &mut raw);
    normalize_ws(&raw)
}

fn collect_text(elem: ElementRef<'_>, out: &mut String) {
    for child in elem.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) => {
                if e.name() == "br" {
                    out.push('\n');
                    continue;
                }
                if matches!(e.name(), "script" | "style") || is_hidden(e) {
                    continue;
                }
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

/// True for elements with an inline `display: none`.
pub fn is_hidden(e: &Element) -> bool {
    e.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("display:none")
    })
}

pub fn normalize_ws(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}
