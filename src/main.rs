use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod db;
mod error;
mod models;
mod pipeline;
mod progress;
mod report;
mod roster;

use models::{ClientStatus, HealthFlag, TouchpointKind};
use pipeline::{ClientQuery, SortKey};
use progress::{phase_for_day, progress_percent};
use roster::ClientRoster;

#[derive(Parser)]
#[command(name = "client-tracker")]
#[command(about = "Client roster tracker for Coach Tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load the demo roster
    Seed,
    /// Import clients from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// List the roster, filtered and ordered
    List {
        #[arg(long, value_enum)]
        status: Option<ClientStatus>,
        #[arg(long, value_enum)]
        health: Option<HealthFlag>,
        /// Case-insensitive match against name or email
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value = "next-action")]
        sort: SortKey,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Emit the filtered roster as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Log a weigh-in for one client
    WeighIn {
        #[arg(long)]
        id: i64,
        /// New weight, free text; rejected unless a positive number
        #[arg(long)]
        weight: String,
    },
    /// Mark today's morning or evening touchpoint complete
    Touchpoint {
        #[arg(long)]
        id: i64,
        #[arg(long, value_enum)]
        kind: TouchpointKind,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coachtools_client_tracker=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;
    tracing::debug!("connected to Postgres");

    let today = Utc::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Demo roster inserted.");
        }
        Commands::Import { csv } => {
            let imported = db::import_csv(&pool, &csv).await?;
            println!("Imported {imported} clients from {}.", csv.display());
        }
        Commands::List {
            status,
            health,
            search,
            sort,
            limit,
            json,
        } => {
            let clients = db::fetch_clients(&pool).await?;
            let query = ClientQuery {
                status,
                health,
                search,
                sort,
            };
            let listed = pipeline::filter_and_sort(&clients, &query);

            if listed.is_empty() {
                println!("No clients match.");
                return Ok(());
            }

            if json {
                let page: Vec<_> = listed.iter().take(limit).collect();
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                for client in listed.iter().take(limit) {
                    let phase = phase_for_day(client.current_day);
                    let percent = progress_percent(
                        client.current_weight,
                        client.start_weight,
                        client.goal_weight,
                    );
                    println!(
                        "- {} ({}) day {} {} - {}% to goal [{}, {}]",
                        client.name,
                        client.email,
                        client.current_day,
                        phase.label,
                        percent,
                        client.health.as_str(),
                        client.status.as_str()
                    );
                }
            }
        }
        Commands::WeighIn { id, weight } => {
            let mut roster = ClientRoster::new(db::fetch_clients(&pool).await?);
            let updated = roster.record_weigh_in(id, &weight, today)?.clone();
            db::save_client(&pool, &updated).await?;
            println!(
                "{} weighed in at {:.1} ({:.1} total lost).",
                updated.name, updated.current_weight, updated.total_lost
            );
        }
        Commands::Touchpoint { id, kind } => {
            let mut roster = ClientRoster::new(db::fetch_clients(&pool).await?);
            let updated = roster.record_touchpoint(id, kind, today)?.clone();
            db::save_client(&pool, &updated).await?;
            println!(
                "Marked {} touchpoint for {}.",
                kind.as_str(),
                updated.name
            );
        }
        Commands::Report { out } => {
            let clients = db::fetch_clients(&pool).await?;
            let report = report::build_report(today, &clients);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
