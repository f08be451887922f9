//! HTML helpers shared by the scraping source and the filing client

use crate::error::{NewsError, Result};
use scraper::{ElementRef, Html, Node, Selector};

const SKIPPED_TAGS: [&str; 3] = ["script", "style", "noscript"];

const BLOCK_TAGS: [&str; 14] = [
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "table", "section", "article",
];

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| NewsError::Config(format!("invalid CSS selector '{css}': {e:?}")))
}

/// Whitespace-normalized text of every element matching `css`, in document order
pub fn select_text(html: &str, css: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .map(|el| normalize(&el.text().collect::<String>()))
        .collect())
}

/// Convert an HTML document to plain text
///
/// Script and style content is dropped; block elements start a new line.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = selector("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());
    element_text(&root)
}

fn element_text(element: &ElementRef<'_>) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for node in element.descendants() {
        match node.value() {
            Node::Element(el) if BLOCK_TAGS.contains(&el.name()) => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            Node::Text(text) => {
                let skipped = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
                });
                let trimmed = text.trim();
                if skipped || trimmed.is_empty() {
                    continue;
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(trimmed);
            }
            _ => {}
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
        .iter()
        .map(|l| normalize(l))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
