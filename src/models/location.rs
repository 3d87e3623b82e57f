//! Location reference records and IATA codes

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static IATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("Invalid IATA pattern"));

/// One row of the airport reference dataset
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationRecord {
    /// Airport name
    pub name: String,
    /// City served by the airport
    pub city: String,
    /// Country name
    pub country: String,
    /// 3-letter IATA code, absent for unlisted airfields
    pub code: Option<IataCode>,
}

impl LocationRecord {
    #[must_use]
    pub fn new(name: &str, city: &str, country: &str, code: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            city: city.trim().to_string(),
            country: country.trim().to_string(),
            code: code.and_then(IataCode::parse),
        }
    }
}

/// A 3-letter uppercase airport or city code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IataCode(String);

impl IataCode {
    /// Normalize (trim, uppercase) and accept only `^[A-Z]{3}$`
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_uppercase();
        IATA_RE
            .is_match(&normalized)
            .then_some(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IataCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
