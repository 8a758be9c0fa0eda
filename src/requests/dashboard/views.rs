use std::collections::BTreeMap;

use serde::Serialize;

use super::repository::RecentRequest;
use crate::requests::domain::RequestKind;

/// Request counts split by document medium; every key is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediumBreakdown {
    pub fisico: u64,
    pub digital: u64,
    pub nao_localizado: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsibleEfficiency {
    pub total: u64,
    pub concluidos: u64,
    pub taxa_conclusao: f64,
    pub tempo_medio: f64,
}

/// Operational snapshot over the requests visible to a scope.
///
/// Built fresh for every query and never stored. Numeric fields default to
/// zero and maps to empty, so consumers never branch on a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub total_registros: u64,
    pub pendentes: u64,
    pub em_andamento: u64,
    pub concluidos: u64,
    pub nao_localizados: u64,
    pub vencidos: u64,
    pub urgentes: u64,
    pub por_tipo: MediumBreakdown,
    pub por_solicitacao: BTreeMap<RequestKind, u64>,
    pub por_mes: BTreeMap<String, u64>,
    /// `concluidos / total_registros`, within `[0, 1]`.
    pub taxa_conclusao: f64,
    /// Average handling time in days.
    pub tempo_medio_atendimento: f64,
    #[serde(rename = "registrosVencendoEm7Dias")]
    pub registros_vencendo_em_7_dias: u64,
    pub eficiencia_por_responsavel: BTreeMap<String, ResponsibleEfficiency>,
    pub recentes: Vec<RecentRequest>,
}
