use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

pub const TRACKING_CODE_PREFIX: &str = "DES";

/// Upper bound (exclusive) of the random suffix stamped on generated codes.
const SEQUENCE_CEILING: u16 = 9999;

fn tracking_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^DES[0-9]{10}$").expect("tracking code pattern compiles"))
}

/// Public barcode stamped on a request: `DES` + `YYMMDD` + a 4-digit suffix.
///
/// Construction only checks the wire format. The embedded date is not required
/// to be a real calendar day; [`TrackingCode::issued_on`] reports that instead.
/// Uniqueness is not guaranteed here and belongs to whatever stores the codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingCode(String);

impl TrackingCode {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTrackingCode);
        }

        if !tracking_pattern().is_match(trimmed) {
            return Err(ValidationError::MalformedTrackingCode(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Build a code for `date` with a suffix drawn from `rng`.
    pub fn generate<R: Rng>(date: NaiveDate, rng: &mut R) -> Result<Self, ValidationError> {
        let suffix: u16 = rng.gen_range(0..SEQUENCE_CEILING);
        let candidate = format!(
            "{TRACKING_CODE_PREFIX}{:02}{:02}{:02}{:04}",
            date.year().rem_euclid(100),
            date.month(),
            date.day(),
            suffix
        );
        Self::new(&candidate)
    }

    /// Build a code for today's local date using the thread RNG.
    pub fn generate_new() -> Result<Self, ValidationError> {
        Self::generate(Local::now().date_naive(), &mut rand::thread_rng())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar year, assuming the two-digit year belongs to the 2000s.
    pub fn year(&self) -> u16 {
        2000 + self.digits(0, 2)
    }

    pub fn month(&self) -> u8 {
        self.digits(2, 4) as u8
    }

    pub fn day(&self) -> u8 {
        self.digits(4, 6) as u8
    }

    pub fn sequence(&self) -> u16 {
        self.digits(6, 10)
    }

    /// The embedded date, when it names a real calendar day.
    pub fn issued_on(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year()),
            u32::from(self.month()),
            u32::from(self.day()),
        )
    }

    // Offsets index the 10-digit body; the pattern guarantees ASCII digits.
    fn digits(&self, start: usize, end: usize) -> u16 {
        let body = &self.0[TRACKING_CODE_PREFIX.len()..];
        body[start..end]
            .bytes()
            .fold(0, |acc, byte| acc * 10 + u16::from(byte - b'0'))
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TrackingCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for TrackingCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for TrackingCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TrackingCode> for String {
    fn from(value: TrackingCode) -> Self {
        value.0
    }
}
