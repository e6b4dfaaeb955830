//! Fundguard command-line runner.
//!
//! `fundguard init` creates the database schema; `fundguard run` executes a
//! full validation run against the database written by the ingestion
//! pipeline, prints the summary, and optionally exports the critical-alerts
//! extract.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use fundguard_core::quality::{write_alerts_csv, ManagerTier, QualityService, RunOutcome};
use fundguard_storage_sqlite::{init_schema, open, SqliteQualitySink, SqliteRecordStore};

#[derive(Parser)]
#[command(name = "fundguard", about = "Fund data quality validation and scoring", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database schema.
    Init {
        /// Path to the SQLite database.
        #[arg(long, value_name = "PATH")]
        database: PathBuf,
    },
    /// Run validation and scoring against a loaded database.
    Run {
        /// Path to the SQLite database.
        #[arg(long, value_name = "PATH")]
        database: PathBuf,

        /// Also export the critical-alerts extract to this CSV file.
        #[arg(long, value_name = "PATH")]
        alerts_csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Init { database } => {
            let conn = open(&database)?;
            init_schema(&conn)?;
            println!("Schema initialized at {}", database.display());
        }
        Command::Run {
            database,
            alerts_csv,
        } => {
            let conn = open(&database)?;
            let store = SqliteRecordStore::new(conn.clone());
            let sink = SqliteQualitySink::new(conn);

            let service = QualityService::new();
            let outcome = service
                .run(&store, &sink)
                .await
                .context("validation run failed")?;

            if let Some(path) = alerts_csv {
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                write_alerts_csv(&outcome.alerts, file)?;
                info!(
                    "Exported {} alert(s) to {}",
                    outcome.alerts.len(),
                    path.display()
                );
            }

            print_summary(&outcome);
        }
    }

    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    println!("Data quality run {}", outcome.run_id);
    println!();
    println!("Issues by severity");
    println!("  critical  {:>6}", outcome.tally.critical);
    println!("  high      {:>6}", outcome.tally.high);
    println!("  medium    {:>6}", outcome.tally.medium);
    println!("  low       {:>6}", outcome.tally.low);
    println!("  total     {:>6}", outcome.tally.total);
    println!();
    println!("Funds analyzed     {:>6}", outcome.funds_analyzed);
    println!("Funds with issues  {:>6}", outcome.funds_with_issues);
    println!("Pass rate          {:>9.2}%", outcome.pass_rate_pct);
    println!();

    println!("Scores (system)");
    for name in [
        "Completeness Score",
        "Accuracy Score",
        "Timeliness Score",
        "Overall Data Quality Score",
    ] {
        if let Some(metric) = outcome
            .metrics
            .iter()
            .find(|m| m.metric_name == name && m.entity_type.as_str() == "System")
        {
            println!(
                "  {:<28} {:>6.2}%  (target {:.0}%)",
                name, metric.metric_value, metric.target_value
            );
        }
    }

    let managers: Vec<_> = outcome
        .metrics
        .iter()
        .filter(|m| m.metric_name == "Manager Quality Score")
        .collect();
    if !managers.is_empty() {
        println!();
        println!("Manager quality");
        for metric in managers {
            println!(
                "  {:<28} {:>6.2}%  {}",
                metric.entity_name,
                metric.metric_value,
                ManagerTier::from_score(metric.metric_value)
            );
        }
    }

    if !outcome.alerts.is_empty() {
        println!();
        println!("{} critical alert(s) require attention", outcome.alerts.len());
        for alert in &outcome.alerts {
            println!(
                "  {}  {}  {}  {}",
                alert.alert_id,
                alert.fund_id,
                alert.rule_violated.as_str(),
                alert.description
            );
        }
    }
}
