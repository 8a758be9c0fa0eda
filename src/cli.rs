use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use desarquivamento::config::AppConfig;
use desarquivamento::error::AppError;
use desarquivamento::requests::dashboard::RawDateRange;
use desarquivamento::requests::domain::{RegistrationNumber, TrackingCode};
use desarquivamento::requests::{
    DashboardAggregator, DashboardQuery, InMemoryRequestRepository, RepositorySettings,
    RequestCsvImporter,
};
use desarquivamento::telemetry;
use serde_json::json;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "desarquivamento",
    about = "Inspect records-retrieval identifiers and compute request dashboards",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the dashboard report for a CSV export of requests
    Dashboard(DashboardArgs),
    /// Generate or inspect tracking codes
    TrackingCode {
        #[command(subcommand)]
        command: TrackingCodeCommand,
    },
    /// Inspect registration numbers
    Registration {
        #[command(subcommand)]
        command: RegistrationCommand,
    },
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// CSV export of requests (defaults to APP_DATA_CSV)
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Restrict the dashboard to what this user may see
    #[arg(long, allow_negative_numbers = true)]
    user_id: Option<i64>,
    /// Role held by the user (repeatable)
    #[arg(long = "role")]
    roles: Vec<String>,
    /// Range start (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    start: Option<String>,
    /// Range end, exclusive (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    end: Option<String>,
    /// Evaluation date for deadlines (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum TrackingCodeCommand {
    /// Print a freshly generated tracking code
    Generate {
        /// Date to embed (defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Validate a tracking code and show its parts
    Inspect { code: String },
}

#[derive(Subcommand, Debug)]
enum RegistrationCommand {
    /// Validate a registration number and show its parts
    Inspect { value: String },
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    match cli.command {
        Command::Dashboard(args) => run_dashboard(&config, args),
        Command::TrackingCode {
            command: TrackingCodeCommand::Generate { date },
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let code = TrackingCode::generate(date, &mut rand::thread_rng())?;
            println!("{code}");
            Ok(())
        }
        Command::TrackingCode {
            command: TrackingCodeCommand::Inspect { code },
        } => {
            let code = TrackingCode::new(&code)?;
            print_json(&json!({
                "codigo": code.as_str(),
                "ano": code.year(),
                "mes": code.month(),
                "dia": code.day(),
                "sequencia": code.sequence(),
                "dataEmissao": code.issued_on(),
            }))
        }
        Command::Registration {
            command: RegistrationCommand::Inspect { value },
        } => {
            let number = RegistrationNumber::new(&value)?;
            print_json(&json!({
                "numero": number.as_str(),
                "normalizado": number.normalized(),
                "formatoAno": number.is_year_format(),
                "ano": number.year(),
                "sequencial": number.sequential_number(),
            }))
        }
    }
}

fn run_dashboard(config: &AppConfig, args: DashboardArgs) -> Result<(), AppError> {
    let DashboardArgs {
        csv,
        user_id,
        roles,
        start,
        end,
        today,
    } = args;

    let path = csv
        .or_else(|| config.repository.data_csv.clone())
        .ok_or(AppError::MissingDataSource)?;

    let query = DashboardQuery {
        user_id,
        user_roles: (!roles.is_empty()).then_some(roles),
        date_range: (start.is_some() || end.is_some()).then_some(RawDateRange { start, end }),
    };
    // Reject a bad scope before reading any data.
    query.validate()?;

    let records = RequestCsvImporter::from_path(&path)?;
    info!(path = %path.display(), count = records.len(), "loaded requests");

    let settings = RepositorySettings {
        privileged_roles: config.visibility.privileged_roles.clone(),
        due_soon_days: config.repository.due_soon_days,
        today,
    };
    let repository = Arc::new(InMemoryRequestRepository::with_records(settings, records));
    let report = DashboardAggregator::new(repository).compute_dashboard(&query)?;

    print_json(&report)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
