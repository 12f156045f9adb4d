//! Text normalizers: phone numbers, province names, and URL slugs.

use std::sync::LazyLock;

use advdir_core::Province;
use regex::Regex;

static PROVINCE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(AB|BC|MB|NB|NL|NS|NT|NU|ON|PE|QC|SK|YT)\b")
        .expect("valid province code regex")
});

/// Full province and territory names in English and French, lower-cased with
/// hyphens folded to spaces. Order is significant: the first entry found in
/// the text wins.
pub(crate) const PROVINCE_NAMES: &[(&str, Province)] = &[
    ("quebec", Province::Quebec),
    ("québec", Province::Quebec),
    ("ontario", Province::Ontario),
    ("new brunswick", Province::NewBrunswick),
    ("nouveau brunswick", Province::NewBrunswick),
    ("nova scotia", Province::NovaScotia),
    ("nouvelle écosse", Province::NovaScotia),
    ("nouvelle ecosse", Province::NovaScotia),
    ("prince edward island", Province::PrinceEdwardIsland),
    ("île du prince édouard", Province::PrinceEdwardIsland),
    ("ile du prince edouard", Province::PrinceEdwardIsland),
    ("newfoundland and labrador", Province::NewfoundlandAndLabrador),
    ("terre neuve et labrador", Province::NewfoundlandAndLabrador),
    ("newfoundland", Province::NewfoundlandAndLabrador),
    ("manitoba", Province::Manitoba),
    ("saskatchewan", Province::Saskatchewan),
    ("alberta", Province::Alberta),
    ("british columbia", Province::BritishColumbia),
    ("colombie britannique", Province::BritishColumbia),
    ("northwest territories", Province::NorthwestTerritories),
    ("territoires du nord ouest", Province::NorthwestTerritories),
    ("nunavut", Province::Nunavut),
    ("yukon", Province::Yukon),
];

/// Formats a North American phone number as `NNN-NNN-NNNN`.
///
/// A leading country code `1` on an 11-digit number is dropped. Any other
/// digit count returns the trimmed input unchanged.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let digits = match digits.strip_prefix('1') {
        Some(rest) if digits.len() == 11 => rest,
        _ => digits.as_str(),
    };
    if digits.len() == 10 {
        format!("{}-{}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
    } else {
        raw.trim().to_string()
    }
}

/// Lower-cases `text`, folds hyphens to spaces, and collapses whitespace.
pub(crate) fn fold_place_name(text: &str) -> String {
    text.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a province from free text.
///
/// A standalone two-letter code wins; otherwise the first full name from
/// [`PROVINCE_NAMES`] contained in the text.
///
/// Codes match case-insensitively as whole words, so ordinary words that
/// spell a code resolve too: `"Follow us on LinkedIn"` yields Ontario.
/// Callers feeding free prose should expect such matches.
#[must_use]
pub fn resolve_province(text: &str) -> Option<Province> {
    if text.trim().is_empty() {
        return None;
    }
    if let Some(m) = PROVINCE_CODE_RE.find(text) {
        return Province::from_code(m.as_str());
    }
    province_from_name(text)
}

/// Full-name lookup only, ignoring two-letter codes.
pub(crate) fn province_from_name(text: &str) -> Option<Province> {
    let folded = fold_place_name(text);
    PROVINCE_NAMES
        .iter()
        .find(|(name, _)| folded.contains(name))
        .map(|(_, p)| *p)
}

/// Turns a URL slug such as `"groupe-tremblay"` into `"Groupe Tremblay"`.
#[must_use]
pub fn slug_to_team_name(slug: &str) -> String {
    slug.replace('-', " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
