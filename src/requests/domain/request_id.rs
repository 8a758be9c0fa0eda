use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Positive integer identity of a stored request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RequestId(i64);

impl RequestId {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::NonPositiveRequestId(value));
        }
        Ok(Self(value))
    }

    /// Accepts numbers coming from loosely typed sources such as JSON floats.
    pub fn from_f64(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
            return Err(ValidationError::NonIntegerRequestId(value.to_string()));
        }
        Self::new(value as i64)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| ValidationError::NonIntegerRequestId(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<i64> for RequestId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RequestId> for i64 {
    fn from(value: RequestId) -> Self {
        value.0
    }
}
