//! URL resolution, canonicalization, and same-site checks.

use reqwest::Url;

/// Resolves `raw` against `base` and canonicalizes the result.
///
/// Returns `None` for unparsable input and for non-http(s) targets such as
/// `mailto:` or `javascript:` links.
pub(crate) fn resolve_and_canonicalize(raw: &str, base: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let base_url = Url::parse(base).ok()?;
    let joined = base_url.join(raw).ok()?;
    if !matches!(joined.scheme(), "http" | "https") {
        return None;
    }
    canonicalize_url(joined.as_str())
}

/// Drops the fragment and query string.
pub(crate) fn canonicalize_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw).ok()?;
    url.set_fragment(None);
    url.set_query(None);
    Some(url.to_string())
}

/// `true` when both URLs share host and effective port.
pub(crate) fn same_site(url: &str, base: &str) -> bool {
    let (Ok(a), Ok(b)) = (Url::parse(url), Url::parse(base)) else {
        return false;
    };
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => {
            ha.eq_ignore_ascii_case(hb) && a.port_or_known_default() == b.port_or_known_default()
        }
        _ => false,
    }
}

/// Path component of an absolute URL, or `""` when it does not parse.
pub(crate) fn path_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default()
}

/// Hostname for error messages; falls back to the full input.
pub(crate) fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.nbfwm.ca";

    #[test]
    fn resolves_relative_paths() {
        assert_eq!(
            resolve_and_canonicalize("/advisor/a/our-team/b.html", BASE).as_deref(),
            Some("https://www.nbfwm.ca/advisor/a/our-team/b.html")
        );
    }

    #[test]
    fn strips_fragment_and_query() {
        assert_eq!(
            resolve_and_canonicalize("/advisor.html?lang=fr#top", BASE).as_deref(),
            Some("https://www.nbfwm.ca/advisor.html")
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(resolve_and_canonicalize("mailto:jane@example.com", BASE).is_none());
        assert!(resolve_and_canonicalize("javascript:void(0)", BASE).is_none());
        assert!(resolve_and_canonicalize("   ", BASE).is_none());
    }

    #[test]
    fn same_site_compares_host_case_insensitively() {
        assert!(same_site("https://WWW.nbfwm.ca/advisor.html", BASE));
        assert!(!same_site("https://locator.nbc.ca/x", BASE));
        assert!(!same_site("http://127.0.0.1:8080/a", "http://127.0.0.1:9090"));
        assert!(same_site("https://www.nbfwm.ca:443/a", BASE));
    }

    #[test]
    fn host_of_falls_back_to_input() {
        assert_eq!(host_of("https://www.nbfwm.ca/advisor.html"), "www.nbfwm.ca");
        assert_eq!(host_of("garbage"), "garbage");
    }
}
