//! schema.org JSON-LD address extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

static JSONLD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid json-ld selector")
});

/// Returns the first usable `address` found in the page's JSON-LD blocks,
/// formatted as `"street, locality, region, postal code"` with empty parts
/// omitted.
///
/// Blocks that fail to parse are skipped.
pub(super) fn extract_jsonld_address(document: &Html) -> Option<String> {
    for script in document.select(&JSONLD_SELECTOR) {
        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            tracing::debug!("skipping unparsable JSON-LD block");
            continue;
        };

        if let Some(address) = candidates(&value).into_iter().find_map(address_of) {
            return Some(address);
        }
    }
    None
}

/// Top-level object, array members, and `@graph` members.
fn candidates(value: &Value) -> Vec<&Value> {
    let mut items: Vec<&Value> = match value {
        Value::Array(arr) => arr.iter().collect(),
        other => vec![other],
    };

    let graph: Vec<&Value> = items
        .iter()
        .filter_map(|item| item.get("@graph").and_then(Value::as_array))
        .flatten()
        .collect();
    items.extend(graph);
    items
}

fn address_of(item: &Value) -> Option<String> {
    match item.get("address")? {
        Value::Object(addr) => {
            let parts: Vec<&str> = [
                "streetAddress",
                "addressLocality",
                "addressRegion",
                "postalCode",
            ]
            .iter()
            .filter_map(|key| addr.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
