use std::fmt;

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::requests::domain::ValidationError;

/// Widest window a dashboard query may cover.
pub const MAX_RANGE_MONTHS: u32 = 24;

/// Identity of the user a dashboard is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::NonPositiveUserId(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for UserId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Half-open interval `[start, end)` of at most [`MAX_RANGE_MONTHS`] months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::DateRangeNotIncreasing);
        }

        if let Some(limit) = start.checked_add_months(Months::new(MAX_RANGE_MONTHS)) {
            if end > limit {
                return Err(ValidationError::DateRangeTooLong {
                    max_months: MAX_RANGE_MONTHS,
                });
            }
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Unvalidated date bounds as they arrive from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Dashboard request as supplied by a caller, before any rule is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_roles: Option<Vec<String>>,
    #[serde(default)]
    pub date_range: Option<RawDateRange>,
}

impl DashboardQuery {
    /// Read a query from loosely typed JSON, reporting shape problems as
    /// validation failures rather than deserialization errors.
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        if let Some(user_id) = value.get("userId").filter(|user_id| !user_id.is_null()) {
            if user_id.as_i64().is_none() {
                return Err(ValidationError::NonIntegerUserId(user_id.to_string()));
            }
        }

        if let Some(roles) = value.get("userRoles").filter(|roles| !roles.is_null()) {
            let all_strings = roles
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false);
            if !all_strings {
                return Err(ValidationError::RolesNotAList);
            }
        }

        serde_json::from_value(value).map_err(|err| ValidationError::MalformedScope(err.to_string()))
    }

    pub fn validate(&self) -> Result<DashboardScope, ValidationError> {
        let date_range = match &self.date_range {
            None => None,
            Some(RawDateRange {
                start: Some(start),
                end: Some(end),
            }) => {
                let start = parse_bound("start", start)?;
                let end = parse_bound("end", end)?;
                Some(DateRange::new(start, end)?)
            }
            Some(RawDateRange {
                start: None,
                end: None,
            }) => None,
            Some(_) => return Err(ValidationError::IncompleteDateRange),
        };

        let user_id = self.user_id.map(UserId::new).transpose()?;

        let user_roles = match &self.user_roles {
            None => Vec::new(),
            Some(roles) => roles
                .iter()
                .map(|role| normalize_role(role))
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(DashboardScope {
            user_id,
            user_roles,
            date_range,
        })
    }
}

fn normalize_role(role: &str) -> Result<String, ValidationError> {
    let trimmed = role.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankRole);
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_bound(field: &'static str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidDateBound {
            field,
            value: raw.to_string(),
        })
}

/// Validated dashboard scope handed to the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardScope {
    pub user_id: Option<UserId>,
    /// Trimmed, lowercased role names.
    pub user_roles: Vec<String>,
    pub date_range: Option<DateRange>,
}

impl DashboardScope {
    pub fn has_any_role(&self, roles: &[String]) -> bool {
        self.user_roles
            .iter()
            .any(|role| roles.iter().any(|candidate| candidate == role))
    }
}
