//! `disrepair` CLI — run overlap calculations from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Request JSON on stdin → result rows on stdout
//! echo '{"periods":[{"roomName":"A","startDate":"01/01/2025","endDate":"07/01/2025"}]}' \
//!   | disrepair calculate
//!
//! # From file to file, overriding the property size
//! disrepair calculate -i request.json -o rows.json --total-rooms 6
//!
//! # Human-readable table
//! disrepair calculate -i request.json --format table
//!
//! # Show the run-length segments behind the rows
//! disrepair segments -i request.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use disrepair_engine::{compute_segments, validate_periods, OverlapRequest, ResultRow};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "disrepair",
    version,
    about = "Disrepair overlap analysis: weeks in disrepair per concurrent room count"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate weeks and percentage of property per room count
    Calculate {
        /// Input request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Override the request's totalRooms / rooms with an explicit property size
        #[arg(long)]
        total_rooms: Option<u32>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print the day segments (runs of equal room count) as JSON
    Segments {
        /// Input request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Calculate {
            input,
            output,
            total_rooms,
            format,
        } => {
            tracing::debug!(input = input.as_deref().unwrap_or("<stdin>"), "reading request");
            let mut request = read_request(input.as_deref())?;
            if let Some(total) = total_rooms {
                tracing::debug!(total, "total rooms override");
                request.total_rooms = Some(f64::from(total));
                request.rooms = None;
            }

            let rows = request.evaluate().context("Failed to calculate overlaps")?;
            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&rows)?,
                Format::Table => render_table(&rows),
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Segments { input } => {
            let request = read_request(input.as_deref())?;
            let periods = validate_periods(request.periods.as_deref())
                .context("Invalid periods")?;
            let segments = compute_segments(&periods).context("Failed to build segments")?;
            tracing::debug!(segments = segments.len(), "built day segments");
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(io::stderr)
        .init();
}

fn render_table(rows: &[ResultRow]) -> String {
    let mut out = format!("{:>5}  {:>6}  {:>13}\n", "Rooms", "Weeks", "% of property");
    for row in rows {
        out.push_str(&format!(
            "{:>5}  {:>6.1}  {:>13.1}\n",
            row.room_count, row.weeks_in_disrepair, row.percentage_of_property
        ));
    }
    out
}

fn read_request(path: Option<&str>) -> Result<OverlapRequest> {
    let json = read_input(path)?;
    OverlapRequest::from_json(&json).context("Failed to parse request JSON")
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
