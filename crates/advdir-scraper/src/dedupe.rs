//! Record filtering and deduplication.

use std::collections::HashSet;

use advdir_core::{AdvisorRecord, Province, RunConfig};

/// Removes duplicate records, keeping first occurrences.
///
/// Records with an email are keyed by the lower-cased email. Records without
/// one are keyed by the lower-cased trimmed name plus the phone with all
/// whitespace removed. Records with an email come first in the output, each
/// group in input order. Applying this twice gives the same result as once.
#[must_use]
pub fn dedupe_records(records: Vec<AdvisorRecord>) -> Vec<AdvisorRecord> {
    let (with_email, without_email): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| !r.email.trim().is_empty());

    let mut seen_emails = HashSet::new();
    let mut seen_name_phone = HashSet::new();

    let before = with_email.len() + without_email.len();
    let deduped: Vec<AdvisorRecord> = with_email
        .into_iter()
        .filter(|r| seen_emails.insert(r.email.trim().to_lowercase()))
        .chain(
            without_email
                .into_iter()
                .filter(|r| seen_name_phone.insert(name_phone_key(r))),
        )
        .collect();

    if deduped.len() < before {
        tracing::debug!(
            before,
            after = deduped.len(),
            "removed duplicate advisor records"
        );
    }
    deduped
}

fn name_phone_key(record: &AdvisorRecord) -> (String, String) {
    (
        record.name.trim().to_lowercase(),
        record.phone.split_whitespace().collect(),
    )
}

/// Province and city constraints applied to each parsed profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub province: Option<Province>,
    /// Lower-cased, trimmed; `None` when no city filter applies.
    city_contains: Option<String>,
}

impl RecordFilter {
    #[must_use]
    pub fn new(province: Option<Province>, city_contains: Option<&str>) -> Self {
        let city_contains = city_contains
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);
        Self {
            province,
            city_contains,
        }
    }

    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.province, config.city_filter())
    }

    /// `true` when `record` satisfies every configured constraint.
    ///
    /// The city filter is a case-insensitive substring test over the
    /// record's city followed by its address hint.
    #[must_use]
    pub fn matches(&self, record: &AdvisorRecord) -> bool {
        if let Some(target) = self.province {
            if record.province != Some(target) {
                return false;
            }
        }
        if let Some(city) = &self.city_contains {
            let haystack = format!("{} {}", record.city, record.address_hint).to_lowercase();
            if !haystack.contains(city.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, email: &str, phone: &str) -> AdvisorRecord {
        AdvisorRecord {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            ..AdvisorRecord::default()
        }
    }

    #[test]
    fn same_email_keeps_first_occurrence() {
        let out = dedupe_records(vec![
            record("Jane Doe", "Jane@Example.com", ""),
            record("J. Doe", "jane@example.com", "514-555-1234"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Jane Doe");
    }

    #[test]
    fn no_email_same_name_and_phone_collapses() {
        let out = dedupe_records(vec![
            record("John Smith", "", "514-555-1234 | 438-555-0000"),
            record(" john smith ", "", "514-555-1234|438-555-0000"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "John Smith");
    }

    #[test]
    fn no_email_differing_name_or_phone_both_survive() {
        let out = dedupe_records(vec![
            record("John Smith", "", "514-555-1234"),
            record("John Smith", "", "514-555-9999"),
            record("Joan Smith", "", "514-555-1234"),
        ]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn email_group_precedes_no_email_group() {
        let out = dedupe_records(vec![
            record("No Email", "", "514-555-1234"),
            record("Has Email", "a@example.com", ""),
        ]);
        assert_eq!(out[0].name, "Has Email");
        assert_eq!(out[1].name, "No Email");
    }

    #[test]
    fn dedupe_is_idempotent() {
        let input = vec![
            record("A", "a@example.com", ""),
            record("B", "", "1"),
            record("A2", "A@EXAMPLE.COM", ""),
            record("B", "", "1"),
            record("C", "", ""),
        ];
        let once = dedupe_records(input);
        let twice = dedupe_records(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn filter_by_province() {
        let filter = RecordFilter::new(Some(Province::Quebec), None);
        let mut r = record("Jane", "", "");
        assert!(!filter.matches(&r));
        r.province = Some(Province::Ontario);
        assert!(!filter.matches(&r));
        r.province = Some(Province::Quebec);
        assert!(filter.matches(&r));
    }

    #[test]
    fn filter_by_city_checks_city_and_address_hint() {
        let filter = RecordFilter::new(None, Some("  montréal "));
        let mut r = record("Jane", "", "");
        assert!(!filter.matches(&r));

        r.city = "Montréal".to_string();
        assert!(filter.matches(&r));

        r.city = String::new();
        r.address_hint = "1 Place Ville Marie, MONTRÉAL, QC".to_string();
        assert!(filter.matches(&r));
    }

    #[test]
    fn blank_city_filter_is_ignored() {
        let filter = RecordFilter::new(None, Some("   "));
        assert_eq!(filter, RecordFilter::default());
        assert!(filter.matches(&AdvisorRecord::default()));
    }

    #[test]
    fn from_config_uses_trimmed_city() {
        let config = RunConfig {
            province: None,
            city_contains: Some(" Laval ".to_string()),
            ..RunConfig::default()
        };
        let filter = RecordFilter::from_config(&config);
        assert_eq!(filter.province, None);
        assert_eq!(filter.city_contains.as_deref(), Some("laval"));
    }
}
