use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::dashboard::{RecentRequest, UserId};
use super::domain::{
    deadline_for, is_due_within, is_overdue, DocumentMedium, RegistrationNumber, RequestId,
    RequestKind, RequestStatus, TrackingCode,
};

/// A request whose every identifier has already been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: RequestId,
    pub tracking_code: TrackingCode,
    pub registration: RegistrationNumber,
    pub kind: RequestKind,
    pub medium: DocumentMedium,
    pub status: RequestStatus,
    pub urgent: bool,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub responsible: Option<String>,
    pub owner: Option<UserId>,
}

impl RequestRecord {
    pub fn requested_on(&self) -> NaiveDate {
        self.requested_at.date_naive()
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        deadline_for(self.kind, self.requested_on())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        is_overdue(self.kind, self.status, self.requested_on(), today)
    }

    pub fn is_due_within(&self, today: NaiveDate, days: u32) -> bool {
        is_due_within(self.kind, self.status, self.requested_on(), today, days)
    }

    /// Days between request and completion, when the record was finished.
    pub fn handling_days(&self) -> Option<f64> {
        if self.status != RequestStatus::Finalizado {
            return None;
        }
        self.completed_at.map(|completed| {
            let seconds = (completed - self.requested_at).num_seconds().max(0);
            seconds as f64 / 86_400.0
        })
    }

    pub fn to_recent(&self) -> RecentRequest {
        RecentRequest {
            id: self.id,
            codigo_barras: self.tracking_code.clone(),
            tipo_solicitacao: self.kind,
            status: self.status,
            urgente: self.urgent,
            data_solicitacao: self.requested_at,
            responsavel: self.responsible.clone(),
        }
    }
}
