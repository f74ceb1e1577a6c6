//! `uekplan` CLI — query timetable snapshots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Every event, ordered by date and start time
//! uekplan query -i timetable.json
//!
//! # Events of group 20, minus one tutor/group/activity/type combination
//! uekplan query -i timetable.json --labels 20 --exclude-combinations 10,20,30,40
//!
//! # Tutors teaching group 20 between two dates (both bounds exclusive)
//! uekplan query -i timetable.json --labels 20 --from 2024-01-01 --to 2024-02-01 --project tutor
//!
//! # List the rooms known to the snapshot
//! uekplan labels -i timetable.json --dimension room
//! ```
//!
//! Set `RUST_LOG=timetable_engine=debug` to see what the engine is doing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use timetable_engine::{Dimension, FilterRequest, Projection, Snapshot};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "uekplan",
    version,
    about = "Query a university timetable snapshot by label"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter events and optionally project them onto one dimension
    Query {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Comma-separated label ids; events referencing any of them match
        #[arg(long)]
        labels: Option<String>,
        /// Comma-separated label ids; events referencing any of them are dropped
        #[arg(long)]
        exclude: Option<String>,
        /// Pipe-separated tutor,group,activity,type rule-groups to drop
        #[arg(long)]
        exclude_combinations: Option<String>,
        /// Lower date bound, exclusive (YYYY-MM-DD; needs --to)
        #[arg(long)]
        from: Option<String>,
        /// Upper date bound, exclusive (YYYY-MM-DD; needs --from)
        #[arg(long)]
        to: Option<String>,
        /// Project matches onto tutor, group, room or activity
        #[arg(long)]
        project: Option<String>,
        /// Skip events marked as deleted
        #[arg(long)]
        live_only: bool,
    },
    /// List labels, optionally of one dimension
    Labels {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Dimension name or upstream code (e.g. "room" or "S")
        #[arg(short, long)]
        dimension: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            input,
            output,
            labels,
            exclude,
            exclude_combinations,
            from,
            to,
            project,
            live_only,
        } => {
            let snapshot = load_snapshot(input.as_deref())?.exclude_deleted(live_only);
            let project = project
                .as_deref()
                .map(str::parse::<Projection>)
                .transpose()
                .context("Invalid --project value")?;

            let request = FilterRequest {
                label_ids: labels,
                exclude_label_ids: exclude,
                exclude_combinations,
                date_from: from,
                date_to: to,
                project,
            };

            let result = timetable_engine::run_query(&snapshot, &request)
                .context("Failed to run timetable query")?;
            tracing::info!(rows = result.len(), "query finished");

            let json = serde_json::to_string_pretty(&result)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Labels { input, dimension } => {
            let snapshot = load_snapshot(input.as_deref())?;
            let labels = match dimension.as_deref() {
                Some(raw) => {
                    let dimension: Dimension = raw.parse().context("Invalid --dimension value")?;
                    snapshot.labels_of(dimension)
                }
                None => snapshot.labels(),
            };
            let json = serde_json::to_string_pretty(&labels)?;
            write_output(None, &json)?;
        }
    }

    Ok(())
}

fn load_snapshot(path: Option<&str>) -> Result<Snapshot> {
    let json = read_input(path)?;
    Snapshot::from_json(&json).context("Failed to load timetable snapshot")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
