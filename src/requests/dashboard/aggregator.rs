use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::repository::{
    DashboardRepository, RawDashboardStats, RawResponsibleEfficiency, RepositoryError,
};
use super::scope::{DashboardQuery, DashboardScope};
use super::views::{DashboardReport, MediumBreakdown, ResponsibleEfficiency};
use crate::requests::domain::{DocumentMedium, RequestKind, ValidationError};

/// Folds repository counts into a [`DashboardReport`].
///
/// Stateless apart from the shared repository handle, so one aggregator can
/// serve concurrent callers.
pub struct DashboardAggregator<R: ?Sized> {
    repository: Arc<R>,
}

impl<R> DashboardAggregator<R>
where
    R: DashboardRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate `query`, then compute the report for the resulting scope.
    ///
    /// Validation failures never reach the repository.
    pub fn compute_dashboard(&self, query: &DashboardQuery) -> Result<DashboardReport, DashboardError> {
        let scope = query.validate().map_err(|err| {
            warn!(error = %err, "rejected dashboard scope");
            err
        })?;
        self.compute_for_scope(&scope)
    }

    pub fn compute_for_scope(&self, scope: &DashboardScope) -> Result<DashboardReport, DashboardError> {
        debug!(
            user_id = scope.user_id.map(|id| id.value()),
            roles = scope.user_roles.len(),
            ranged = scope.date_range.is_some(),
            "fetching dashboard stats"
        );
        let stats = self.repository.dashboard_stats(scope)?;
        let report = build_report(stats)?;
        debug!(
            total = report.total_registros,
            vencidos = report.vencidos,
            "dashboard computed"
        );
        Ok(report)
    }
}

/// Error raised while computing a dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Infrastructure(#[from] RepositoryError),
}

pub(crate) fn build_report(stats: RawDashboardStats) -> Result<DashboardReport, RepositoryError> {
    let bucketed = [
        stats.pendentes,
        stats.em_andamento,
        stats.concluidos,
        stats.nao_localizados,
    ]
    .into_iter()
    .fold(0u64, u64::saturating_add);
    if bucketed > stats.total_registros {
        return Err(RepositoryError::Inconsistent(format!(
            "status buckets add up to {bucketed} but total is {}",
            stats.total_registros
        )));
    }

    let por_tipo = MediumBreakdown {
        fisico: count_for(&stats.por_tipo, DocumentMedium::Fisico.code()),
        digital: count_for(&stats.por_tipo, DocumentMedium::Digital.code()),
        nao_localizado: count_for(&stats.por_tipo, DocumentMedium::NaoLocalizado.code()),
    };

    let por_solicitacao = RequestKind::ordered()
        .into_iter()
        .map(|kind| (kind, count_for(&stats.por_solicitacao, kind.code())))
        .collect();

    let eficiencia_por_responsavel = stats
        .eficiencia_por_responsavel
        .unwrap_or_default()
        .into_iter()
        .map(|(name, raw)| (name, responsible_efficiency(raw)))
        .collect();

    Ok(DashboardReport {
        total_registros: stats.total_registros,
        pendentes: stats.pendentes,
        em_andamento: stats.em_andamento,
        concluidos: stats.concluidos,
        nao_localizados: stats.nao_localizados,
        vencidos: stats.vencidos,
        urgentes: stats.urgentes,
        por_tipo,
        por_solicitacao,
        por_mes: stats.por_mes,
        taxa_conclusao: completion_rate(stats.concluidos, stats.total_registros),
        tempo_medio_atendimento: finite_or_zero(stats.tempo_medio_atendimento),
        registros_vencendo_em_7_dias: stats.registros_vencendo_em_7_dias,
        eficiencia_por_responsavel,
        recentes: stats.recentes,
    })
}

fn responsible_efficiency(raw: RawResponsibleEfficiency) -> ResponsibleEfficiency {
    ResponsibleEfficiency {
        total: raw.total,
        concluidos: raw.concluidos,
        taxa_conclusao: completion_rate(raw.concluidos, raw.total),
        tempo_medio: finite_or_zero(raw.tempo_medio),
    }
}

// Keys are matched case-insensitively; repositories disagree on casing.
fn count_for(counts: &BTreeMap<String, u64>, code: &str) -> u64 {
    counts
        .iter()
        .filter(|(key, _)| key.trim().eq_ignore_ascii_case(code))
        .map(|(_, count)| *count)
        .sum()
}

pub fn completion_rate(concluidos: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (concluidos as f64 / total as f64).clamp(0.0, 1.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubRepository {
        stats: RawDashboardStats,
        calls: AtomicUsize,
    }

    impl StubRepository {
        fn new(stats: RawDashboardStats) -> Self {
            Self {
                stats,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DashboardRepository for StubRepository {
        fn dashboard_stats(
            &self,
            _scope: &DashboardScope,
        ) -> Result<RawDashboardStats, RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.stats.clone())
        }
    }

    struct FailingRepository;

    impl DashboardRepository for FailingRepository {
        fn dashboard_stats(
            &self,
            _scope: &DashboardScope,
        ) -> Result<RawDashboardStats, RepositoryError> {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn empty_population_has_zero_completion_rate() {
        let repository = Arc::new(StubRepository::new(RawDashboardStats::default()));
        let aggregator = DashboardAggregator::new(repository);

        let report = aggregator
            .compute_dashboard(&DashboardQuery::default())
            .expect("report builds");

        assert_eq!(report.total_registros, 0);
        assert_eq!(report.taxa_conclusao, 0.0);
        assert_eq!(report.por_tipo, MediumBreakdown::default());
        assert_eq!(report.por_solicitacao.len(), 4);
        assert!(report.por_solicitacao.values().all(|count| *count == 0));
    }

    #[test]
    fn missing_medium_keys_default_to_zero() {
        let stats = RawDashboardStats {
            total_registros: 5,
            por_tipo: BTreeMap::from([("FISICO".to_string(), 3), ("DIGITAL".to_string(), 2)]),
            ..RawDashboardStats::default()
        };
        let report = build_report(stats).expect("report builds");

        assert_eq!(report.por_tipo.fisico, 3);
        assert_eq!(report.por_tipo.digital, 2);
        assert_eq!(report.por_tipo.nao_localizado, 0);

        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json["porTipo"]["naoLocalizado"], 0);
    }

    #[test]
    fn completion_rate_is_recomputed_from_counts() {
        let stats = RawDashboardStats {
            total_registros: 8,
            pendentes: 2,
            em_andamento: 1,
            concluidos: 4,
            nao_localizados: 1,
            taxa_conclusao: 87.0,
            ..RawDashboardStats::default()
        };
        let report = build_report(stats).expect("report builds");
        assert_eq!(report.taxa_conclusao, 0.5);
    }

    #[test]
    fn pre_aggregated_deadline_counts_pass_through() {
        let stats = RawDashboardStats {
            total_registros: 10,
            pendentes: 6,
            vencidos: 4,
            urgentes: 3,
            registros_vencendo_em_7_dias: 2,
            ..RawDashboardStats::default()
        };
        let report = build_report(stats).expect("report builds");
        assert_eq!(report.vencidos, 4);
        assert_eq!(report.urgentes, 3);
        assert_eq!(report.registros_vencendo_em_7_dias, 2);
    }

    #[test]
    fn buckets_exceeding_total_are_rejected() {
        let stats = RawDashboardStats {
            total_registros: 3,
            pendentes: 2,
            concluidos: 2,
            ..RawDashboardStats::default()
        };
        assert!(matches!(
            build_report(stats),
            Err(RepositoryError::Inconsistent(_))
        ));
    }

    #[test]
    fn non_finite_averages_become_zero() {
        let stats = RawDashboardStats {
            tempo_medio_atendimento: f64::NAN,
            eficiencia_por_responsavel: Some(BTreeMap::from([(
                "Maria".to_string(),
                RawResponsibleEfficiency {
                    total: 4,
                    concluidos: 1,
                    tempo_medio: f64::INFINITY,
                },
            )])),
            total_registros: 4,
            ..RawDashboardStats::default()
        };
        let report = build_report(stats).expect("report builds");
        assert_eq!(report.tempo_medio_atendimento, 0.0);
        let maria = &report.eficiencia_por_responsavel["Maria"];
        assert_eq!(maria.tempo_medio, 0.0);
        assert_eq!(maria.taxa_conclusao, 0.25);
    }

    #[test]
    fn validation_failures_do_not_touch_the_repository() {
        let repository = Arc::new(StubRepository::new(RawDashboardStats::default()));
        let aggregator = DashboardAggregator::new(repository.clone());
        let query = DashboardQuery {
            user_id: Some(-4),
            ..DashboardQuery::default()
        };

        match aggregator.compute_dashboard(&query) {
            Err(DashboardError::Validation(ValidationError::NonPositiveUserId(-4))) => {}
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(repository.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn repository_failures_propagate_unchanged() {
        let aggregator = DashboardAggregator::new(Arc::new(FailingRepository));
        match aggregator.compute_dashboard(&DashboardQuery::default()) {
            Err(DashboardError::Infrastructure(RepositoryError::Unavailable(message))) => {
                assert_eq!(message, "connection refused")
            }
            other => panic!("expected infrastructure error, got {other:?}"),
        }
    }
}
