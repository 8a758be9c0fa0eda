use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub repository: RepositoryConfig,
    pub visibility: VisibilityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let data_csv = env::var("APP_DATA_CSV")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let due_soon_days = match env::var("APP_DUE_SOON_DAYS") {
            Ok(raw) => parse_due_soon_days(&raw)?,
            Err(_) => DEFAULT_DUE_SOON_DAYS,
        };

        let privileged_roles = parse_roles(
            &env::var("APP_PRIVILEGED_ROLES").unwrap_or_else(|_| "admin,supervisor".to_string()),
        );
        if privileged_roles.is_empty() {
            return Err(ConfigError::NoPrivilegedRoles);
        }

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            repository: RepositoryConfig {
                data_csv,
                due_soon_days,
            },
            visibility: VisibilityConfig { privileged_roles },
        })
    }
}

pub const DEFAULT_DUE_SOON_DAYS: u32 = 7;
/// Widest "due soon" horizon the dashboard accepts.
pub const MAX_DUE_SOON_DAYS: u32 = 365;

fn parse_due_soon_days(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(days) if (1..=MAX_DUE_SOON_DAYS).contains(&days) => Ok(days),
        _ => Err(ConfigError::InvalidDueSoonDays(raw.to_string())),
    }
}

fn parse_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|role| role.trim().to_ascii_lowercase())
        .filter(|role| !role.is_empty())
        .collect()
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where request data comes from and how far ahead "due soon" looks.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    pub data_csv: Option<PathBuf>,
    pub due_soon_days: u32,
}

/// Roles allowed to see every request regardless of ownership.
#[derive(Debug, Clone)]
pub struct VisibilityConfig {
    pub privileged_roles: Vec<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDueSoonDays(String),
    NoPrivilegedRoles,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDueSoonDays(value) => write!(
                f,
                "APP_DUE_SOON_DAYS must be an integer between 1 and {}, got '{}'",
                MAX_DUE_SOON_DAYS, value
            ),
            ConfigError::NoPrivilegedRoles => {
                write!(f, "APP_PRIVILEGED_ROLES must name at least one role")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_DATA_CSV");
        env::remove_var("APP_DUE_SOON_DAYS");
        env::remove_var("APP_PRIVILEGED_ROLES");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.repository.data_csv.is_none());
        assert_eq!(config.repository.due_soon_days, 7);
        assert_eq!(
            config.visibility.privileged_roles,
            vec!["admin".to_string(), "supervisor".to_string()]
        );
    }

    #[test]
    fn privileged_roles_are_trimmed_and_lowercased() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PRIVILEGED_ROLES", " Admin , ,Arquivo ");
        env::set_var("APP_ENV", "prod");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.visibility.privileged_roles,
            vec!["admin".to_string(), "arquivo".to_string()]
        );
        reset_env();
    }

    #[test]
    fn rejects_blank_privileged_roles() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PRIVILEGED_ROLES", " , ");
        let error = AppConfig::load().expect_err("blank roles rejected");
        assert!(matches!(error, ConfigError::NoPrivilegedRoles));
        reset_env();
    }

    #[test]
    fn rejects_zero_due_soon_days() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DUE_SOON_DAYS", "0");
        match AppConfig::load() {
            Err(ConfigError::InvalidDueSoonDays(value)) => assert_eq!(value, "0"),
            other => panic!("expected invalid due soon days, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn due_soon_days_are_bounded() {
        assert_eq!(parse_due_soon_days(" 365 ").expect("upper bound allowed"), 365);
        for raw in ["366", "100000000", "-3", "soon"] {
            match parse_due_soon_days(raw) {
                Err(ConfigError::InvalidDueSoonDays(value)) => assert_eq!(value, raw),
                other => panic!("expected invalid due soon days, got {other:?}"),
            }
        }
    }
}
