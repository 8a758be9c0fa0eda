mod parser;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::dashboard::UserId;
use super::domain::{
    DocumentMedium, RegistrationNumber, RequestId, RequestKind, RequestStatus, TrackingCode,
    ValidationError,
};
use super::record::RequestRecord;
use parser::{parse_flag, parse_timestamp, RequestRow};

#[derive(Debug)]
pub enum RequestImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row {
        line: u64,
        source: ValidationError,
    },
    InvalidTimestamp {
        line: u64,
        column: &'static str,
        value: String,
    },
    InvalidFlag {
        line: u64,
        value: String,
    },
    DuplicateId {
        line: u64,
        id: RequestId,
        first_line: u64,
    },
}

impl std::fmt::Display for RequestImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestImportError::Io(err) => write!(f, "failed to read request export: {}", err),
            RequestImportError::Csv(err) => write!(f, "invalid request CSV data: {}", err),
            RequestImportError::Row { line, source } => write!(f, "line {}: {}", line, source),
            RequestImportError::InvalidTimestamp {
                line,
                column,
                value,
            } => write!(
                f,
                "line {}: {} '{}' is not a recognized timestamp",
                line, column, value
            ),
            RequestImportError::InvalidFlag { line, value } => {
                write!(f, "line {}: urgente '{}' is not a yes/no value", line, value)
            }
            RequestImportError::DuplicateId {
                line,
                id,
                first_line,
            } => write!(
                f,
                "line {}: id {} was already used on line {}",
                line, id, first_line
            ),
        }
    }
}

impl std::error::Error for RequestImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestImportError::Io(err) => Some(err),
            RequestImportError::Csv(err) => Some(err),
            RequestImportError::Row { source, .. } => Some(source),
            RequestImportError::InvalidTimestamp { .. }
            | RequestImportError::InvalidFlag { .. }
            | RequestImportError::DuplicateId { .. } => None,
        }
    }
}

impl From<std::io::Error> for RequestImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RequestImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads request rows exported as CSV, validating every identifier on the way in.
///
/// Ids must be unique within one export.
pub struct RequestCsvImporter;

impl RequestCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RequestRecord>, RequestImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RequestRecord>, RequestImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut records = Vec::new();
        let mut seen: HashMap<RequestId, u64> = HashMap::new();

        for result in csv_reader.records() {
            let raw = result?;
            let line = raw.position().map(|position| position.line()).unwrap_or(0);
            let row: RequestRow = raw.deserialize(Some(&headers))?;
            let record = record_from_row(row, line)?;
            if let Some(&first_line) = seen.get(&record.id) {
                return Err(RequestImportError::DuplicateId {
                    line,
                    id: record.id,
                    first_line,
                });
            }
            seen.insert(record.id, line);
            records.push(record);
        }

        debug!(count = records.len(), "imported request rows");
        Ok(records)
    }
}

fn record_from_row(row: RequestRow, line: u64) -> Result<RequestRecord, RequestImportError> {
    let invalid = |source: ValidationError| RequestImportError::Row { line, source };

    let requested_at = parse_timestamp(&row.data_solicitacao).ok_or_else(|| {
        RequestImportError::InvalidTimestamp {
            line,
            column: "data_solicitacao",
            value: row.data_solicitacao.clone(),
        }
    })?;

    let completed_at = match row.data_conclusao.as_deref() {
        None => None,
        Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
            RequestImportError::InvalidTimestamp {
                line,
                column: "data_conclusao",
                value: raw.to_string(),
            }
        })?),
    };

    let urgent =
        parse_flag(row.urgente.as_deref()).ok_or_else(|| RequestImportError::InvalidFlag {
            line,
            value: row.urgente.clone().unwrap_or_default(),
        })?;

    let owner = row
        .usuario_id
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| ValidationError::NonIntegerUserId(raw.to_string()))
                .and_then(UserId::new)
        })
        .transpose()
        .map_err(invalid)?;

    Ok(RequestRecord {
        id: row.id.parse::<RequestId>().map_err(invalid)?,
        tracking_code: TrackingCode::new(&row.codigo_barras).map_err(invalid)?,
        registration: RegistrationNumber::new(&row.numero_registro).map_err(invalid)?,
        kind: row.tipo.parse::<RequestKind>().map_err(invalid)?,
        medium: row.tipo_documento.parse::<DocumentMedium>().map_err(invalid)?,
        status: row.status.parse::<RequestStatus>().map_err(invalid)?,
        urgent,
        requested_at,
        completed_at,
        responsible: row.responsavel,
        owner,
    })
}
