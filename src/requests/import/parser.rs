use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub(crate) struct RequestRow {
    pub(crate) id: String,
    pub(crate) codigo_barras: String,
    pub(crate) numero_registro: String,
    pub(crate) tipo: String,
    pub(crate) tipo_documento: String,
    pub(crate) status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) urgente: Option<String>,
    pub(crate) data_solicitacao: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) data_conclusao: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) responsavel: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) usuario_id: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or a bare date at midnight UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `sim`/`s`/`true`/`1` and `nao`/`não`/`n`/`false`/`0`; blank means false.
pub(crate) fn parse_flag(value: Option<&str>) -> Option<bool> {
    let Some(value) = value else {
        return Some(false);
    };
    match value.trim().to_lowercase().as_str() {
        "sim" | "s" | "true" | "1" | "yes" => Some(true),
        "nao" | "não" | "n" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
