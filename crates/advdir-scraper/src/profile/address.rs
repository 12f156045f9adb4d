//! Address hint extraction as an ordered chain of strategies.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::jsonld::extract_jsonld_address;
use crate::html::{anchors, element_text};
use crate::normalize::resolve_province;

/// Lines picked from free text are cut to this many characters.
const MAX_LINE_CHARS: usize = 180;

static POSTAL_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[ABCEGHJ-NPRSTVXY]\d[ABCEGHJ-NPRSTV-Z][ -]?\d[ABCEGHJ-NPRSTV-Z]\d\b")
        .expect("valid postal code regex")
});

/// Inputs shared by every strategy: the parsed page and its visible lines.
pub(super) struct PageView<'a> {
    pub document: &'a Html,
    pub lines: &'a [String],
}

type Strategy = fn(&PageView<'_>) -> Option<String>;

/// Strategies in precedence order; the first non-empty result wins.
pub(super) const ADDRESS_STRATEGIES: [(&str, Strategy); 4] = [
    ("locator-link", locator_link_text),
    ("json-ld", jsonld_address),
    ("postal-code", postal_code_line),
    ("province-line", province_line),
];

/// Runs the strategy chain and returns the first hint found, or `""`.
pub(super) fn extract_address_hint(view: &PageView<'_>) -> String {
    for (name, strategy) in ADDRESS_STRATEGIES {
        if let Some(hint) = strategy(view).filter(|h| !h.trim().is_empty()) {
            tracing::debug!(strategy = name, hint = %hint, "address hint found");
            return hint.trim().to_string();
        }
    }
    String::new()
}

/// Branch locator links display the branch address as their text.
fn locator_link_text(view: &PageView<'_>) -> Option<String> {
    anchors(view.document)
        .filter(|(_, href)| href.to_lowercase().contains("locator"))
        .map(|(a, _)| element_text(a))
        .find(|text| !text.is_empty())
}

fn jsonld_address(view: &PageView<'_>) -> Option<String> {
    extract_jsonld_address(view.document)
}

fn postal_code_line(view: &PageView<'_>) -> Option<String> {
    view.lines
        .iter()
        .find(|line| POSTAL_CODE_RE.is_match(line))
        .map(|line| truncate_chars(line, MAX_LINE_CHARS))
}

fn province_line(view: &PageView<'_>) -> Option<String> {
    view.lines
        .iter()
        .find(|line| resolve_province(line).is_some())
        .map(|line| truncate_chars(line, MAX_LINE_CHARS))
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::document_lines;

    fn hint_for(html: &str) -> String {
        let document = Html::parse_document(html);
        let lines = document_lines(&document);
        extract_address_hint(&PageView {
            document: &document,
            lines: &lines,
        })
    }

    #[test]
    fn locator_link_wins_over_everything() {
        let html = r#"<body>
            <p>H2X 1Y4</p>
            <a href="https://locator.nbc.ca/branch/123">1 Place Ville Marie, Montreal, QC</a>
        </body>"#;
        assert_eq!(hint_for(html), "1 Place Ville Marie, Montreal, QC");
    }

    #[test]
    fn empty_locator_link_falls_through() {
        let html = r#"<body><a href="/locator"><img src="pin.png"></a>
            <p>Suite 100, Laval H7T 2P5</p></body>"#;
        assert_eq!(hint_for(html), "Suite 100, Laval H7T 2P5");
    }

    #[test]
    fn jsonld_beats_text_lines() {
        let html = r#"<html><head><script type="application/ld+json">
            {"address":{"addressLocality":"Quebec City","addressRegion":"QC"}}
            </script></head><body><p>Toronto, Ontario</p></body></html>"#;
        assert_eq!(hint_for(html), "Quebec City, QC");
    }

    #[test]
    fn postal_code_line_beats_province_line() {
        let html = r#"<body><p>Serving clients across Ontario</p>
            <p>100 King St W, Toronto M5X 1A9</p></body>"#;
        assert_eq!(hint_for(html), "100 King St W, Toronto M5X 1A9");
    }

    #[test]
    fn province_line_is_last_resort() {
        let html = r"<body><h1>Jane</h1><p>Sherbrooke, Québec</p></body>";
        assert_eq!(hint_for(html), "Sherbrooke, Québec");
    }

    #[test]
    fn long_lines_are_truncated() {
        let long = format!("Montreal QC {}", "x".repeat(400));
        let html = format!("<body><p>{long}</p></body>");
        assert_eq!(hint_for(&html).chars().count(), MAX_LINE_CHARS);
    }

    #[test]
    fn nothing_found_yields_empty() {
        assert_eq!(hint_for("<body><h1>Jane Doe</h1><p>Wealth Advisor</p></body>"), "");
    }
}
