use serde::{Deserialize, Serialize};

use crate::Province;

/// One advisor profile as extracted from the directory.
///
/// String fields are empty when the page did not yield a value; a missing
/// field is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRecord {
    pub name: String,
    pub email: String,
    /// Up to three distinct normalized numbers joined by `" | "`.
    pub phone: String,
    /// Display name derived from the team slug in the profile URL.
    pub team_name: String,
    pub province: Option<Province>,
    /// Only ever populated from the directory location index.
    pub city: String,
    /// Raw best-effort address snippet the province was resolved from.
    pub address_hint: String,
    /// Absolute, canonical profile URL on the configured site.
    pub profile_url: String,
}

impl AdvisorRecord {
    /// The province as a two-letter code, or `""` when unresolved.
    #[must_use]
    pub fn province_code(&self) -> &'static str {
        self.province.map_or("", Province::code)
    }
}
