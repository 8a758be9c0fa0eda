use crate::config::ConfigError;
use crate::requests::domain::ValidationError;
use crate::requests::{DashboardError, RequestImportError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(RequestImportError),
    Dashboard(DashboardError),
    Validation(ValidationError),
    Serialization(serde_json::Error),
    MissingDataSource,
}

impl AppError {
    /// Process exit code: 2 for input the caller can correct, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_)
            | AppError::Dashboard(DashboardError::Validation(_))
            | AppError::Import(_)
            | AppError::MissingDataSource => 2,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Dashboard(DashboardError::Infrastructure(_))
            | AppError::Serialization(_) => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Dashboard(DashboardError::Validation(err)) | AppError::Validation(err) => {
                write!(f, "validation error: {}", err)
            }
            AppError::Dashboard(DashboardError::Infrastructure(err)) => {
                write!(f, "infrastructure error: {}", err)
            }
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
            AppError::MissingDataSource => write!(
                f,
                "no request data: pass --csv or set APP_DATA_CSV"
            ),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Dashboard(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Serialization(err) => Some(err),
            AppError::MissingDataSource => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RequestImportError> for AppError {
    fn from(value: RequestImportError) -> Self {
        Self::Import(value)
    }
}

impl From<DashboardError> for AppError {
    fn from(value: DashboardError) -> Self {
        Self::Dashboard(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::dashboard::RepositoryError;

    #[test]
    fn caller_errors_exit_with_two() {
        let error = AppError::from(DashboardError::Validation(
            ValidationError::DateRangeNotIncreasing,
        ));
        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.to_string(),
            "validation error: date range start must be strictly before its end"
        );
    }

    #[test]
    fn infrastructure_errors_exit_with_one() {
        let error = AppError::from(DashboardError::Infrastructure(RepositoryError::Unavailable(
            "timeout".to_string(),
        )));
        assert_eq!(error.exit_code(), 1);
        assert_eq!(
            error.to_string(),
            "infrastructure error: repository unavailable: timeout"
        );
    }
}
