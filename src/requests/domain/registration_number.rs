use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

pub const MIN_REGISTRATION_LENGTH: usize = 5;
pub const MAX_REGISTRATION_LENGTH: usize = 50;

fn allowed_characters() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9./\s-]+$").expect("registration character pattern compiles")
    })
}

fn year_format() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{4})\.([0-9]{3})\.[0-9]+$").expect("year format pattern compiles")
    })
}

/// Archival or process registration number a request refers to.
///
/// Stored trimmed but otherwise as typed. Comparisons for search go through
/// [`RegistrationNumber::normalize`], which also collapses inner whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::EmptyRegistrationNumber);
        }

        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len < MIN_REGISTRATION_LENGTH {
            return Err(ValidationError::RegistrationNumberTooShort {
                len,
                min: MIN_REGISTRATION_LENGTH,
            });
        }
        if len > MAX_REGISTRATION_LENGTH {
            return Err(ValidationError::RegistrationNumberTooLong {
                len,
                max: MAX_REGISTRATION_LENGTH,
            });
        }

        if !allowed_characters().is_match(trimmed) {
            return Err(ValidationError::RegistrationNumberInvalidCharacters);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Trim and collapse whitespace runs to a single space.
    pub fn normalize(raw: &str) -> String {
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn normalized(&self) -> String {
        Self::normalize(&self.0)
    }

    /// True when `raw` names the same registration once both sides are normalized.
    pub fn matches(&self, raw: &str) -> bool {
        self.normalized() == Self::normalize(raw)
    }

    /// `YYYY.NNN.<digits>` registrations carry a year and a sequential segment.
    pub fn is_year_format(&self) -> bool {
        year_format().is_match(&self.normalized())
    }

    pub fn year(&self) -> Option<u16> {
        let normalized = self.normalized();
        year_format()
            .captures(&normalized)
            .and_then(|captures| captures.get(1))
            .and_then(|year| year.as_str().parse().ok())
    }

    pub fn sequential_number(&self) -> Option<String> {
        let normalized = self.normalized();
        year_format()
            .captures(&normalized)
            .and_then(|captures| captures.get(2))
            .map(|segment| segment.as_str().to_string())
    }
}

impl fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegistrationNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RegistrationNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RegistrationNumber> for String {
    fn from(value: RegistrationNumber) -> Self {
        value.0
    }
}
