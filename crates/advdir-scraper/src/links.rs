//! Advisor profile link discovery.
//!
//! Profile pages live at
//! `/advisor/<team-slug>/(our-team|notre-equipe)/<advisor-slug>.html`.
//! Links are collected from anchors and, because some directory markup
//! renders links from script data, from quoted paths anywhere in the raw
//! HTML. Both sources are always unioned.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::html::anchors;
use crate::urls::{path_of, resolve_and_canonicalize, same_site};

static PROFILE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/advisor/.+/(our-team|notre-equipe)/.+\.html$")
        .expect("valid profile path regex")
});

static QUOTED_PROFILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"(/advisor/[^"]+/(?:our-team|notre-equipe)/[^"]+\.html)""#)
        .expect("valid quoted profile regex")
});

static QUOTED_ADVISOR_PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"(/advisor/[^"]+\.html)""#).expect("valid quoted advisor page regex")
});

/// `true` when `url` is an absolute profile URL on the same site as `base_url`.
pub(crate) fn is_profile_url(url: &str, base_url: &str) -> bool {
    same_site(url, base_url) && PROFILE_PATH_RE.is_match(&path_of(url))
}

/// Resolves an `href` and returns it when it points at a profile page.
pub(crate) fn resolve_profile_href(href: &str, base_url: &str) -> Option<String> {
    let url = resolve_and_canonicalize(href, base_url)?;
    is_profile_url(&url, base_url).then_some(url)
}

/// Extracts absolute advisor profile URLs from `html`.
///
/// The result is sorted and deduplicated, so repeated calls on the same
/// document always agree.
#[must_use]
pub fn extract_advisor_links(html: &str, base_url: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut links: BTreeSet<String> = anchors(&document)
        .filter_map(|(_, href)| resolve_profile_href(href, base_url))
        .collect();

    links.extend(
        QUOTED_PROFILE_RE
            .captures_iter(html)
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| resolve_profile_href(m.as_str(), base_url)),
    );

    links
}

/// Extracts same-site pages under `/advisor/` ending in `.html`, which may
/// list further profiles (team pages, city pages).
///
/// Anchors resolve against `page_url`; quoted raw paths against `base_url`.
#[must_use]
pub fn extract_internal_pages(html: &str, page_url: &str, base_url: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut pages: BTreeSet<String> = anchors(&document)
        .filter_map(|(_, href)| resolve_and_canonicalize(href, page_url))
        .filter(|url| is_advisor_page(url, base_url))
        .collect();

    pages.extend(
        QUOTED_ADVISOR_PAGE_RE
            .captures_iter(html)
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| resolve_and_canonicalize(m.as_str(), base_url))
            .filter(|url| is_advisor_page(url, base_url)),
    );

    pages
}

fn is_advisor_page(url: &str, base_url: &str) -> bool {
    if !same_site(url, base_url) {
        return false;
    }
    let path = path_of(url).to_lowercase();
    path.starts_with("/advisor/") && path.ends_with(".html")
}
