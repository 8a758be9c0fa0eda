use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scope::DashboardScope;
use crate::requests::domain::{RequestId, RequestKind, RequestStatus, TrackingCode};

/// Source of pre-aggregated request counts for a dashboard scope.
///
/// Implementations own visibility rules and querying; the aggregator only
/// reshapes what comes back. A single call per dashboard.
pub trait DashboardRepository: Send + Sync {
    fn dashboard_stats(&self, scope: &DashboardScope) -> Result<RawDashboardStats, RepositoryError>;
}

/// Infrastructure failure raised by a repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("repository returned inconsistent data: {0}")]
    Inconsistent(String),
}

/// Grouped counts exactly as a repository reports them.
///
/// Every field defaults so a sparse payload still deserializes; the
/// aggregator decides what missing data means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDashboardStats {
    pub total_registros: u64,
    pub pendentes: u64,
    pub em_andamento: u64,
    pub concluidos: u64,
    pub nao_localizados: u64,
    pub vencidos: u64,
    pub urgentes: u64,
    /// Keyed by document medium code: `FISICO`, `DIGITAL`, `NAO_LOCALIZADO`.
    pub por_tipo: BTreeMap<String, u64>,
    /// Keyed by request kind code.
    pub por_solicitacao: BTreeMap<String, u64>,
    pub por_mes: BTreeMap<String, u64>,
    pub taxa_conclusao: f64,
    pub tempo_medio_atendimento: f64,
    #[serde(rename = "registrosVencendoEm7Dias")]
    pub registros_vencendo_em_7_dias: u64,
    pub eficiencia_por_responsavel: Option<BTreeMap<String, RawResponsibleEfficiency>>,
    pub recentes: Vec<RecentRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawResponsibleEfficiency {
    pub total: u64,
    pub concluidos: u64,
    pub tempo_medio: f64,
}

/// Slim view of a recently requested record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRequest {
    pub id: RequestId,
    pub codigo_barras: TrackingCode,
    pub tipo_solicitacao: RequestKind,
    pub status: RequestStatus,
    pub urgente: bool,
    pub data_solicitacao: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsavel: Option<String>,
}
