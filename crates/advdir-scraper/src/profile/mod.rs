//! Advisor profile page parsing.
//!
//! Every field is resolved independently with ordered fallbacks. Parsing
//! never fails: a field that cannot be found is left empty.

mod address;
mod jsonld;

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use advdir_core::AdvisorRecord;
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{Html, Selector};

use crate::html::{anchors, document_lines, element_text};
use crate::location_index::LocationIndex;
use crate::normalize::{normalize_phone, resolve_province, slug_to_team_name};
use crate::urls::path_of;
use address::{extract_address_hint, PageView};

/// Separator between multiple phone numbers in [`AdvisorRecord::phone`].
pub const PHONE_SEPARATOR: &str = " | ";
const MAX_PHONES: usize = 3;

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[A-Z0-9._%+\-]+@[A-Z0-9.\-]+\.[A-Z]{2,}").expect("valid email regex")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:1[-\s]?)?\(?\d{3}\)?[-\s]?\d{3}[-\s]?\d{4}\b").expect("valid phone regex")
});

/// Parses one profile page into an [`AdvisorRecord`].
///
/// `url` is the canonical profile URL the page was fetched from. Province
/// comes from the on-page address hint first and from `index` otherwise;
/// city only ever comes from `index`.
#[must_use]
pub fn parse_profile(html: &str, url: &str, index: &LocationIndex) -> AdvisorRecord {
    let document = Html::parse_document(html);
    let lines = document_lines(&document);

    let address_hint = extract_address_hint(&PageView {
        document: &document,
        lines: &lines,
    });
    let directory = index.get(url);
    let province =
        resolve_province(&address_hint).or_else(|| directory.map(|entry| entry.province));
    let city = directory.map(|entry| entry.city.clone()).unwrap_or_default();

    AdvisorRecord {
        name: extract_name(&document),
        email: extract_email(&document, &lines),
        phone: extract_phones(&document, &lines).join(PHONE_SEPARATOR),
        team_name: team_name_from_url(url),
        province,
        city,
        address_hint,
        profile_url: url.to_string(),
    }
}

fn extract_name(document: &Html) -> String {
    if let Some(name) = document
        .select(&H1_SELECTOR)
        .next()
        .map(element_text)
        .filter(|n| !n.is_empty())
    {
        return name;
    }

    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .and_then(|title| title.split('|').next().map(|s| s.trim().to_string()))
        .unwrap_or_default()
}

/// Target of a `scheme:` link, percent-decoded and trimmed, when `href`
/// uses that scheme.
fn link_target(href: &str, scheme: &str) -> Option<String> {
    let (prefix, rest) = href.split_at_checked(scheme.len())?;
    if !prefix.eq_ignore_ascii_case(scheme) {
        return None;
    }
    Some(percent_decode_str(rest).decode_utf8_lossy().trim().to_string())
}

fn extract_email(document: &Html, lines: &[String]) -> String {
    let mailto = anchors(document)
        .find_map(|(_, href)| link_target(href, "mailto:"))
        .map(|target| {
            target
                .split('?')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        });
    if let Some(email) = mailto.filter(|e| !e.is_empty()) {
        return email;
    }

    let text = lines.join("\n");
    let found: BTreeSet<&str> = EMAIL_RE.find_iter(&text).map(|m| m.as_str()).collect();
    found.first().map(|e| (*e).to_string()).unwrap_or_default()
}

/// Up to three distinct normalized numbers, `tel:` links first.
fn extract_phones(document: &Html, lines: &[String]) -> Vec<String> {
    let mut raw: Vec<String> = anchors(document)
        .filter_map(|(_, href)| link_target(href, "tel:"))
        .map(|target| normalize_phone(&target))
        .filter(|p| !p.is_empty())
        .collect();

    if raw.is_empty() {
        let text = lines.join("\n");
        raw = PHONE_RE
            .find_iter(&text)
            .map(|m| normalize_phone(m.as_str()))
            .collect();
    }

    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|p| seen.insert(p.clone()))
        .take(MAX_PHONES)
        .collect()
}

/// Team display name from `/advisor/<team-slug>/...`.
fn team_name_from_url(url: &str) -> String {
    let path = path_of(url);
    let mut segments = path.trim_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some(first), Some(team)) if first.eq_ignore_ascii_case("advisor") => {
            slug_to_team_name(team)
        }
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "../profile_test.rs"]
mod tests;
