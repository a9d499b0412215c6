//! Text helpers shared by the parsers

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

// Runs of whitespace, no-break spaces and soft hyphens collapse to one
// ordinary space. The source pages use all three interchangeably.
static WS_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s\u{00A0}\u{00AD}]+").expect("invalid regex: whitespace run")
});

static P_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("static selector"));

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_ws(text: &str) -> String {
    WS_RUN_RE.replace_all(text, " ").trim().to_string()
}

/// Concatenated text content of an element.
pub fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Raw text of every paragraph element in document order.
///
/// Field extraction operates on this flat list; whitespace normalization is
/// applied per field because the resolution pattern needs the raw text.
pub fn paragraphs(document: &Html) -> Vec<String> {
    document.select(&P_SELECTOR).map(elem_text).collect()
}
