use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Category of service a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    Desarquivamento,
    Copia,
    Vista,
    Certidao,
}

/// Fixed metadata carried by every [`RequestKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindProfile {
    pub code: &'static str,
    pub label: &'static str,
    pub default_deadline_days: u32,
    pub requires_physical_location: bool,
    pub allows_urgency: bool,
}

const DESARQUIVAMENTO: KindProfile = KindProfile {
    code: "DESARQUIVAMENTO",
    label: "Desarquivamento",
    default_deadline_days: 30,
    requires_physical_location: true,
    allows_urgency: true,
};

const COPIA: KindProfile = KindProfile {
    code: "COPIA",
    label: "Cópia",
    default_deadline_days: 15,
    requires_physical_location: true,
    allows_urgency: true,
};

const VISTA: KindProfile = KindProfile {
    code: "VISTA",
    label: "Vista",
    default_deadline_days: 10,
    requires_physical_location: true,
    allows_urgency: true,
};

const CERTIDAO: KindProfile = KindProfile {
    code: "CERTIDAO",
    label: "Certidão",
    default_deadline_days: 20,
    requires_physical_location: false,
    allows_urgency: true,
};

impl RequestKind {
    pub const fn ordered() -> [Self; 4] {
        [Self::Desarquivamento, Self::Copia, Self::Vista, Self::Certidao]
    }

    pub const fn profile(self) -> &'static KindProfile {
        match self {
            Self::Desarquivamento => &DESARQUIVAMENTO,
            Self::Copia => &COPIA,
            Self::Vista => &VISTA,
            Self::Certidao => &CERTIDAO,
        }
    }

    pub const fn code(self) -> &'static str {
        self.profile().code
    }

    pub const fn label(self) -> &'static str {
        self.profile().label
    }

    pub const fn default_deadline_days(self) -> u32 {
        self.profile().default_deadline_days
    }

    pub const fn requires_physical_location(self) -> bool {
        self.profile().requires_physical_location
    }

    pub const fn allows_urgency(self) -> bool {
        self.profile().allows_urgency
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RequestKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownRequestKind(trimmed.to_string()))
    }
}

/// Whether the requested document exists physically, digitally, or was not found.
///
/// These are the keys of the repository's `porTipo` breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentMedium {
    Fisico,
    Digital,
    NaoLocalizado,
}

impl DocumentMedium {
    pub const fn ordered() -> [Self; 3] {
        [Self::Fisico, Self::Digital, Self::NaoLocalizado]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Fisico => "FISICO",
            Self::Digital => "DIGITAL",
            Self::NaoLocalizado => "NAO_LOCALIZADO",
        }
    }
}

impl fmt::Display for DocumentMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DocumentMedium {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ordered()
            .into_iter()
            .find(|medium| medium.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownDocumentMedium(trimmed.to_string()))
    }
}
