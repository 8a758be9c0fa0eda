use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};

use super::dashboard::{
    completion_rate, DashboardRepository, DashboardScope, RawDashboardStats,
    RawResponsibleEfficiency, RepositoryError,
};
use super::domain::{RequestId, StatusBucket};
use super::record::RequestRecord;
use crate::config::DEFAULT_DUE_SOON_DAYS;

/// How many of the latest requests a dashboard lists.
pub const RECENT_LIMIT: usize = 10;

/// Knobs for [`InMemoryRequestRepository`].
#[derive(Debug, Clone)]
pub struct RepositorySettings {
    /// Lowercase roles that see every request.
    pub privileged_roles: Vec<String>,
    pub due_soon_days: u32,
    /// Evaluation date for deadline math; the local date when unset.
    pub today: Option<NaiveDate>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            privileged_roles: vec!["admin".to_string(), "supervisor".to_string()],
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
            today: None,
        }
    }
}

/// Request store kept in memory, answering dashboard queries by folding records.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRequestRepository {
    records: Arc<Mutex<BTreeMap<RequestId, RequestRecord>>>,
    settings: RepositorySettings,
}

impl InMemoryRequestRepository {
    pub fn new(settings: RepositorySettings) -> Self {
        Self {
            records: Arc::default(),
            settings,
        }
    }

    /// Seed the store; like [`Self::upsert`], a later record replaces an
    /// earlier one with the same id.
    pub fn with_records<I>(settings: RepositorySettings, records: I) -> Self
    where
        I: IntoIterator<Item = RequestRecord>,
    {
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self {
            records: Arc::new(Mutex::new(records)),
            settings,
        }
    }

    /// Insert or replace the record with the same id.
    pub fn upsert(&self, record: RequestRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        guard.insert(record.id, record);
        Ok(())
    }

    pub fn fetch(&self, id: RequestId) -> Result<Option<RequestRecord>, RepositoryError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<RequestId, RequestRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("request store lock poisoned".to_string()))
    }

    fn is_visible(&self, scope: &DashboardScope, record: &RequestRecord) -> bool {
        let in_range = scope
            .date_range
            .map_or(true, |range| range.contains(record.requested_at));
        if !in_range {
            return false;
        }

        match scope.user_id {
            None => true,
            Some(_) if scope.has_any_role(&self.settings.privileged_roles) => true,
            Some(user_id) => record.owner == Some(user_id),
        }
    }
}

impl DashboardRepository for InMemoryRequestRepository {
    fn dashboard_stats(&self, scope: &DashboardScope) -> Result<RawDashboardStats, RepositoryError> {
        let today = self
            .settings
            .today
            .unwrap_or_else(|| Local::now().date_naive());
        let guard = self.lock()?;
        let visible: Vec<&RequestRecord> = guard
            .values()
            .filter(|record| self.is_visible(scope, record))
            .collect();

        Ok(fold_stats(&visible, today, self.settings.due_soon_days))
    }
}

#[derive(Default)]
struct Handling {
    total: u64,
    concluidos: u64,
    days: Vec<f64>,
}

fn fold_stats(records: &[&RequestRecord], today: NaiveDate, due_soon_days: u32) -> RawDashboardStats {
    let mut stats = RawDashboardStats {
        total_registros: records.len() as u64,
        ..RawDashboardStats::default()
    };
    let mut handling_days = Vec::new();
    let mut by_responsible: BTreeMap<String, Handling> = BTreeMap::new();

    for record in records {
        match record.status.bucket() {
            Some(StatusBucket::Pendente) => stats.pendentes += 1,
            Some(StatusBucket::EmAndamento) => stats.em_andamento += 1,
            Some(StatusBucket::Concluido) => stats.concluidos += 1,
            Some(StatusBucket::NaoLocalizado) => stats.nao_localizados += 1,
            None => {}
        }

        if record.is_overdue(today) {
            stats.vencidos += 1;
        }
        if record.urgent && record.status.is_open() {
            stats.urgentes += 1;
        }
        if record.is_due_within(today, due_soon_days) {
            stats.registros_vencendo_em_7_dias += 1;
        }

        *stats
            .por_tipo
            .entry(record.medium.code().to_string())
            .or_default() += 1;
        *stats
            .por_solicitacao
            .entry(record.kind.code().to_string())
            .or_default() += 1;
        *stats
            .por_mes
            .entry(record.requested_at.format("%Y-%m").to_string())
            .or_default() += 1;

        let days = record.handling_days();
        if let Some(days) = days {
            handling_days.push(days);
        }

        if let Some(name) = record.responsible.as_deref() {
            let entry = by_responsible.entry(name.to_string()).or_default();
            entry.total += 1;
            if record.status.bucket() == Some(StatusBucket::Concluido) {
                entry.concluidos += 1;
            }
            if let Some(days) = days {
                entry.days.push(days);
            }
        }
    }

    stats.taxa_conclusao = completion_rate(stats.concluidos, stats.total_registros);
    stats.tempo_medio_atendimento = average(&handling_days);
    stats.eficiencia_por_responsavel = Some(
        by_responsible
            .into_iter()
            .map(|(name, handling)| {
                (
                    name,
                    RawResponsibleEfficiency {
                        total: handling.total,
                        concluidos: handling.concluidos,
                        tempo_medio: average(&handling.days),
                    },
                )
            })
            .collect(),
    );

    let mut recent: Vec<&RequestRecord> = records.to_vec();
    recent.sort_by(|a, b| {
        b.requested_at
            .cmp(&a.requested_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    stats.recentes = recent
        .into_iter()
        .take(RECENT_LIMIT)
        .map(RequestRecord::to_recent)
        .collect();

    stats
}

/// Mean rounded to two decimals; zero for an empty slice.
fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 100.0).round() / 100.0
}
