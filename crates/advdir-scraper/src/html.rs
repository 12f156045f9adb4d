//! Typed DOM accessors shared by the extractors.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

pub(crate) static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Elements whose text content is never rendered.
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Text of `element` with every whitespace run, inside or between text
/// nodes, collapsed to a single space.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visible text below `element`, one trimmed non-empty line per entry.
///
/// Text inside `script`, `style`, `noscript`, and `template` is skipped.
/// Text nodes containing newlines contribute one entry per line.
pub(crate) fn visible_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        lines.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
    }
    lines
}

/// Visible text lines of a whole document.
pub(crate) fn document_lines(document: &Html) -> Vec<String> {
    visible_lines(document.root_element())
}

/// Nearest ancestor of `element` that is one of `tags`, else the immediate
/// parent element.
pub(crate) fn enclosing_container<'a>(
    element: ElementRef<'a>,
    tags: &[&str],
) -> Option<ElementRef<'a>> {
    let mut parents = element.ancestors().filter_map(ElementRef::wrap);
    let first = parents.next()?;
    if tags.contains(&first.value().name()) {
        return Some(first);
    }
    parents
        .find(|e| tags.contains(&e.value().name()))
        .or(Some(first))
}

/// Innermost `tags` elements strictly below `element`, in document order.
/// An element is innermost when none of its descendants is also one of
/// `tags`, so inline markup inside a block stays with its block.
pub(crate) fn innermost_blocks<'a>(element: ElementRef<'a>, tags: &[&str]) -> Vec<ElementRef<'a>> {
    let is_block = |e: &ElementRef<'_>| tags.contains(&e.value().name());
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(is_block)
        .filter(|e| {
            !e.descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .any(|d| is_block(&d))
        })
        .collect()
}

/// Iterates `a[href]` elements with their trimmed `href` values.
pub(crate) fn anchors(document: &Html) -> impl Iterator<Item = (ElementRef<'_>, &str)> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href").map(|href| (a, href.trim())))
}
