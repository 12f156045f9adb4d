//! Directory location index: profile URL to the "City, Province" line shown
//! next to the advisor on the seed directory page.

use std::collections::HashMap;
use std::sync::LazyLock;

use advdir_core::Province;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::html::{
    anchors, element_text, enclosing_container, innermost_blocks, visible_lines, ANCHOR_SELECTOR,
};
use crate::links::resolve_profile_href;
use crate::normalize::{province_from_name, PROVINCE_NAMES};

const CONTAINER_TAGS: [&str; 4] = ["li", "article", "section", "div"];

/// Blocks whose joined text is tried when no single text line matches.
const BLOCK_TAGS: [&str; 11] = [
    "address", "dd", "div", "h2", "h3", "h4", "h5", "h6", "li", "p", "td",
];

/// `"<city>, <full province name>"` at the start of a line. Province names
/// accept either hyphens or spaces between words.
static CITY_PROVINCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names = PROVINCE_NAMES
        .iter()
        .map(|(name, _)| {
            name.split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[\s\-]+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)^(?P<city>[^,]+?)\s*,\s*(?P<province>{names})\b"))
        .expect("valid city/province regex")
});

/// City and province inferred from the directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLocation {
    pub city: String,
    pub province: Province,
}

/// Lookup from canonical profile URL to its [`DirectoryLocation`].
///
/// Profiles whose listing shows no recognizable location have no entry.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    entries: HashMap<String, DirectoryLocation>,
}

impl LocationIndex {
    /// Scans every profile anchor on the seed page and records the first
    /// "City, Province" line found in its enclosing container.
    #[must_use]
    pub fn build(seed_html: &str, base_url: &str) -> Self {
        let document = Html::parse_document(seed_html);
        let mut entries = HashMap::new();

        for (anchor, href) in anchors(&document) {
            let Some(url) = resolve_profile_href(href, base_url) else {
                continue;
            };
            if entries.contains_key(&url) {
                continue;
            }
            let Some(container) = enclosing_container(anchor, &CONTAINER_TAGS) else {
                continue;
            };
            if let Some(location) = find_location(container) {
                entries.insert(url, location);
            }
        }

        tracing::debug!(entries = entries.len(), "built directory location index");
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, profile_url: &str) -> Option<&DirectoryLocation> {
        self.entries.get(profile_url)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First "City, Province" in `container`: single text lines first, then
/// whole inner blocks so `Montreal, <strong>Quebec</strong>` still matches.
/// Blocks holding a link are skipped since their text includes the name.
fn find_location(container: ElementRef<'_>) -> Option<DirectoryLocation> {
    visible_lines(container)
        .iter()
        .find_map(|line| parse_city_province(line))
        .or_else(|| {
            innermost_blocks(container, &BLOCK_TAGS)
                .into_iter()
                .filter(|block| block.select(&ANCHOR_SELECTOR).next().is_none())
                .find_map(|block| parse_city_province(&element_text(block)))
        })
}

fn parse_city_province(line: &str) -> Option<DirectoryLocation> {
    let caps = CITY_PROVINCE_RE.captures(line.trim())?;
    let city = caps.name("city")?.as_str().trim();
    if city.is_empty() {
        return None;
    }
    let province = province_from_name(caps.name("province")?.as_str())?;
    Some(DirectoryLocation {
        city: city.to_string(),
        province,
    })
}
