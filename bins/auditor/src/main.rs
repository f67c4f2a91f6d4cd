//! Storage audit CLI.
//!
//! Runs a single reconciliation between `uploaded_files` and the configured
//! object store, prints the report to stdout and exits non-zero on failure.
//! Logs go to stderr.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumora_core::reconciliation::ReconciliationService;
use lumora_core::report::ReportFormatter;
use lumora_core::storage::StorageService;
use lumora_db::{FileRecordRepository, with_connection};
use lumora_shared::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "storage-audit", author, version, about, long_about = None)]
struct Args {
    /// Only audit objects under this key prefix
    #[arg(short, long)]
    prefix: Option<String>,

    /// Report output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Number of sample keys to include
    #[arg(long)]
    sample_size: Option<usize>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lumora=info".into());

    let json_layer = json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = AppConfig::load().context("Failed to load configuration")?;

    let mut audit = config.audit.clone();
    if args.prefix.is_some() {
        audit.prefix = args.prefix.clone();
    }
    if let Some(sample_size) = args.sample_size {
        audit.sample_size = sample_size;
    }

    let storage = StorageService::from_optional_provider(config.storage.clone(), audit.page_size);

    let outcome = with_connection(&config.database, |db| async move {
        let records = Arc::new(FileRecordRepository::new(db));
        ReconciliationService::from_audit_config(records, storage, &audit)
            .run()
            .await
    })
    .await;

    let report = ReportFormatter::render(&outcome);
    if report.success {
        info!("Storage audit finished");
    } else {
        warn!(
            code = report.error.as_ref().map_or("", |e| e.code.as_str()),
            "Storage audit did not complete"
        );
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!("{}", ReportFormatter::summary_text(&report)),
    }

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["storage-audit"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.prefix.is_none());
        assert!(!args.json_logs);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "storage-audit",
            "--prefix",
            "photographers/",
            "--format",
            "json",
            "--sample-size",
            "25",
            "--json-logs",
        ])
        .unwrap();
        assert_eq!(args.prefix.as_deref(), Some("photographers/"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.sample_size, Some(25));
        assert!(args.json_logs);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["storage-audit", "--format", "xml"]).is_err());
    }
}
