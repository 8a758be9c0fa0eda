use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::kind::RequestKind;

/// Lifecycle stage of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Solicitado,
    Desarquivado,
    Finalizado,
    NaoLocalizado,
    RearquivamentoSolicitado,
    RetiradoPeloSetor,
}

/// Reporting bucket a status is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusBucket {
    Pendente,
    EmAndamento,
    Concluido,
    NaoLocalizado,
}

impl RequestStatus {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Solicitado,
            Self::Desarquivado,
            Self::Finalizado,
            Self::NaoLocalizado,
            Self::RearquivamentoSolicitado,
            Self::RetiradoPeloSetor,
        ]
    }

    pub const fn initial() -> Self {
        Self::Solicitado
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Solicitado => "SOLICITADO",
            Self::Desarquivado => "DESARQUIVADO",
            Self::Finalizado => "FINALIZADO",
            Self::NaoLocalizado => "NAO_LOCALIZADO",
            Self::RearquivamentoSolicitado => "REARQUIVAMENTO_SOLICITADO",
            Self::RetiradoPeloSetor => "RETIRADO_PELO_SETOR",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Solicitado => "Solicitado",
            Self::Desarquivado => "Desarquivado",
            Self::Finalizado => "Finalizado",
            Self::NaoLocalizado => "Não localizado",
            Self::RearquivamentoSolicitado => "Rearquivamento solicitado",
            Self::RetiradoPeloSetor => "Retirado pelo setor",
        }
    }

    /// RETIRADO_PELO_SETOR is counted in the total but in no bucket.
    pub const fn bucket(self) -> Option<StatusBucket> {
        match self {
            Self::Solicitado => Some(StatusBucket::Pendente),
            Self::Desarquivado | Self::RearquivamentoSolicitado => Some(StatusBucket::EmAndamento),
            Self::Finalizado => Some(StatusBucket::Concluido),
            Self::NaoLocalizado => Some(StatusBucket::NaoLocalizado),
            Self::RetiradoPeloSetor => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finalizado | Self::RetiradoPeloSetor)
    }

    /// Still awaiting work; closed requests never count as overdue or due soon.
    pub const fn is_open(self) -> bool {
        !matches!(
            self,
            Self::Finalizado | Self::NaoLocalizado | Self::RetiradoPeloSetor
        )
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Solicitado => matches!(
                next,
                Self::Desarquivado | Self::NaoLocalizado | Self::RearquivamentoSolicitado
            ),
            Self::Desarquivado | Self::NaoLocalizado | Self::RearquivamentoSolicitado => {
                matches!(next, Self::Finalizado | Self::RetiradoPeloSetor)
            }
            Self::Finalizado | Self::RetiradoPeloSetor => false,
        }
    }

    pub fn transition_to(self, next: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ValidationError::IllegalTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ordered()
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownRequestStatus(trimmed.to_string()))
    }
}

/// Last day a request of `kind` can be served on time, `None` past the
/// calendar's upper bound.
pub fn deadline_for(kind: RequestKind, requested_on: NaiveDate) -> Option<NaiveDate> {
    requested_on.checked_add_days(Days::new(u64::from(kind.default_deadline_days())))
}

pub fn is_overdue(
    kind: RequestKind,
    status: RequestStatus,
    requested_on: NaiveDate,
    today: NaiveDate,
) -> bool {
    status.is_open() && deadline_for(kind, requested_on).is_some_and(|deadline| today > deadline)
}

/// Open and not yet overdue, with the deadline no more than `days` away.
pub fn is_due_within(
    kind: RequestKind,
    status: RequestStatus,
    requested_on: NaiveDate,
    today: NaiveDate,
    days: u32,
) -> bool {
    if !status.is_open() {
        return false;
    }
    let Some(deadline) = deadline_for(kind, requested_on) else {
        return false;
    };
    // A horizon past the calendar's end covers every remaining date.
    let horizon = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    deadline >= today && deadline <= horizon
}
