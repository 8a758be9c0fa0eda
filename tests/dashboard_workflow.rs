use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use desarquivamento::requests::dashboard::{
    DashboardError, DashboardQuery, DashboardRepository, DashboardScope, RawDashboardStats,
    RawDateRange, RawResponsibleEfficiency, RepositoryError,
};
use desarquivamento::requests::domain::{RequestKind, ValidationError};
use desarquivamento::requests::{
    DashboardAggregator, InMemoryRequestRepository, RepositorySettings, RequestCsvImporter,
    RequestImportError,
};

/// Returns fixed stats and remembers the scopes it was asked about.
#[derive(Default)]
struct RecordingRepository {
    stats: RawDashboardStats,
    scopes: Mutex<Vec<DashboardScope>>,
}

impl DashboardRepository for RecordingRepository {
    fn dashboard_stats(&self, scope: &DashboardScope) -> Result<RawDashboardStats, RepositoryError> {
        self.scopes
            .lock()
            .expect("scope log poisoned")
            .push(scope.clone());
        Ok(self.stats.clone())
    }
}

fn fixed_stats() -> RawDashboardStats {
    RawDashboardStats {
        total_registros: 42,
        pendentes: 10,
        em_andamento: 12,
        concluidos: 15,
        nao_localizados: 3,
        vencidos: 6,
        urgentes: 4,
        por_tipo: BTreeMap::from([
            ("FISICO".to_string(), 30),
            ("DIGITAL".to_string(), 9),
            ("NAO_LOCALIZADO".to_string(), 3),
        ]),
        por_mes: BTreeMap::from([("2025-01".to_string(), 20), ("2025-02".to_string(), 22)]),
        taxa_conclusao: 35.7,
        tempo_medio_atendimento: 6.25,
        registros_vencendo_em_7_dias: 5,
        eficiencia_por_responsavel: Some(BTreeMap::from([(
            "Carlos".to_string(),
            RawResponsibleEfficiency {
                total: 20,
                concluidos: 10,
                tempo_medio: 5.5,
            },
        )])),
        ..RawDashboardStats::default()
    }
}

fn ranged(start: &str, end: &str) -> DashboardQuery {
    DashboardQuery {
        date_range: Some(RawDateRange {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }),
        ..DashboardQuery::default()
    }
}

#[test]
fn admin_scope_yields_a_fully_populated_report() {
    let repository = Arc::new(RecordingRepository {
        stats: fixed_stats(),
        ..RecordingRepository::default()
    });
    let aggregator = DashboardAggregator::new(repository.clone());
    let query = DashboardQuery {
        user_id: Some(5),
        user_roles: Some(vec!["admin".to_string()]),
        date_range: None,
    };

    let report = aggregator.compute_dashboard(&query).expect("report builds");
    assert_eq!(report.total_registros, 42);
    assert_eq!(report.vencidos, 6);
    assert_eq!(report.registros_vencendo_em_7_dias, 5);

    let json = serde_json::to_value(&report).expect("serializes");
    for field in [
        "totalRegistros",
        "pendentes",
        "emAndamento",
        "concluidos",
        "naoLocalizados",
        "vencidos",
        "urgentes",
        "porTipo",
        "porSolicitacao",
        "porMes",
        "taxaConclusao",
        "tempoMedioAtendimento",
        "registrosVencendoEm7Dias",
        "eficienciaPorResponsavel",
        "recentes",
    ] {
        assert!(json.get(field).is_some(), "report is missing {field}");
    }
    assert_eq!(json["totalRegistros"], 42);
    assert_eq!(json["eficienciaPorResponsavel"]["Carlos"]["taxaConclusao"], 0.5);

    let rate = report.taxa_conclusao;
    assert!((rate - 15.0 / 42.0).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&rate));
    for kind in RequestKind::ordered() {
        assert_eq!(report.por_solicitacao.get(&kind), Some(&0));
    }

    let scopes = repository.scopes.lock().expect("scope log poisoned");
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].user_id.map(|id| id.value()), Some(5));
    assert_eq!(scopes[0].user_roles, vec!["admin"]);
}

#[test]
fn inverted_or_empty_ranges_are_rejected() {
    let aggregator = DashboardAggregator::new(Arc::new(RecordingRepository::default()));
    for (start, end) in [("2025-05-01", "2025-05-01"), ("2025-05-02", "2025-05-01")] {
        match aggregator.compute_dashboard(&ranged(start, end)) {
            Err(DashboardError::Validation(ValidationError::DateRangeNotIncreasing)) => {}
            other => panic!("expected non-increasing range error, got {other:?}"),
        }
    }
}

#[test]
fn two_year_boundary_is_inclusive() {
    let repository = Arc::new(RecordingRepository::default());
    let aggregator = DashboardAggregator::new(repository.clone());

    assert!(aggregator
        .compute_dashboard(&ranged("2024-01-15", "2026-01-15"))
        .is_ok());
    match aggregator.compute_dashboard(&ranged("2024-01-15", "2026-01-16")) {
        Err(DashboardError::Validation(ValidationError::DateRangeTooLong { .. })) => {}
        other => panic!("expected range too long, got {other:?}"),
    }
    assert_eq!(
        repository.scopes.lock().expect("scope log poisoned").len(),
        1,
        "only the valid query reaches the repository"
    );
}

#[test]
fn csv_export_flows_through_the_in_memory_repository() {
    let csv = "\
id,codigo_barras,numero_registro,tipo,tipo_documento,status,urgente,data_solicitacao,data_conclusao,responsavel,usuario_id
1,DES2501020001,2024.001.000001,DESARQUIVAMENTO,FISICO,SOLICITADO,sim,2025-01-02,,Ana,5
2,DES2501030002,2024.001.000002,COPIA,DIGITAL,DESARQUIVADO,nao,2025-01-03,,Ana,5
3,DES2501040003,2024.001.000003,VISTA,FISICO,FINALIZADO,,2025-01-04,2025-01-06,Bruno,7
4,DES2501050004,2024.002.000004,CERTIDAO,NAO_LOCALIZADO,NAO_LOCALIZADO,,2025-01-05,,Bruno,7
";
    let records = RequestCsvImporter::from_reader(Cursor::new(csv)).expect("csv imports");
    let settings = RepositorySettings {
        today: NaiveDate::from_ymd_opt(2025, 1, 14),
        ..RepositorySettings::default()
    };
    let repository = Arc::new(InMemoryRequestRepository::with_records(settings, records));
    let aggregator = DashboardAggregator::new(repository);

    let everyone = aggregator
        .compute_dashboard(&DashboardQuery::default())
        .expect("report builds");
    assert_eq!(everyone.total_registros, 4);
    assert_eq!(everyone.pendentes, 1);
    assert_eq!(everyone.em_andamento, 1);
    assert_eq!(everyone.concluidos, 1);
    assert_eq!(everyone.nao_localizados, 1);
    assert_eq!(everyone.por_tipo.nao_localizado, 1);
    assert_eq!(everyone.por_solicitacao[&RequestKind::Certidao], 1);
    assert_eq!(everyone.urgentes, 1);
    // COPIA from 2025-01-03 is due 2025-01-18, within a week of 2025-01-14.
    assert_eq!(everyone.registros_vencendo_em_7_dias, 1);
    assert_eq!(everyone.vencidos, 0);
    assert_eq!(everyone.tempo_medio_atendimento, 2.0);
    assert_eq!(everyone.taxa_conclusao, 0.25);

    let own = aggregator
        .compute_dashboard(&DashboardQuery {
            user_id: Some(7),
            user_roles: Some(vec!["atendente".to_string()]),
            date_range: None,
        })
        .expect("report builds");
    assert_eq!(own.total_registros, 2);
    assert_eq!(own.eficiencia_por_responsavel.len(), 1);
    assert!(own.eficiencia_por_responsavel.contains_key("Bruno"));
}

#[test]
fn aggregator_accepts_a_type_erased_repository() {
    let repository: Arc<dyn DashboardRepository> = Arc::new(RecordingRepository {
        stats: fixed_stats(),
        ..RecordingRepository::default()
    });
    let aggregator = DashboardAggregator::new(repository);

    let report = aggregator
        .compute_dashboard(&DashboardQuery::default())
        .expect("report builds");
    assert_eq!(report.total_registros, 42);
}

#[test]
fn duplicate_ids_in_an_export_never_reach_the_repository() {
    let csv = "\
id,codigo_barras,numero_registro,tipo,tipo_documento,status,urgente,data_solicitacao,data_conclusao,responsavel,usuario_id
1,DES2501020001,2024.001.000001,VISTA,FISICO,SOLICITADO,,2025-01-02,,,
1,DES2501030002,2024.001.000002,COPIA,DIGITAL,SOLICITADO,,2025-01-03,,,
";
    match RequestCsvImporter::from_reader(Cursor::new(csv)) {
        Err(RequestImportError::DuplicateId {
            line: 3,
            first_line: 2,
            id,
        }) => assert_eq!(id.value(), 1),
        other => panic!("expected duplicate id error, got {other:?}"),
    }
}

#[test]
fn concurrent_dashboards_are_independent() {
    let repository = Arc::new(RecordingRepository {
        stats: fixed_stats(),
        ..RecordingRepository::default()
    });
    let aggregator = DashboardAggregator::new(repository.clone());

    std::thread::scope(|scope| {
        for user in 1..=8 {
            let aggregator = &aggregator;
            scope.spawn(move || {
                let query = DashboardQuery {
                    user_id: Some(user),
                    ..DashboardQuery::default()
                };
                let report = aggregator.compute_dashboard(&query).expect("report builds");
                assert_eq!(report.total_registros, 42);
            });
        }
    });

    assert_eq!(repository.scopes.lock().expect("scope log poisoned").len(), 8);
}
