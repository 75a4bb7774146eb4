//! CLI for the Territory distributor permission hierarchy.
//!
//! Two front ends over the same session: an interactive menu (`shell`) and
//! a line-oriented script runner (`run`).

mod session;

use clap::{Parser, Subcommand};
use session::{split_regions, Command, Outcome, Session};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use territory_analyzer::sink::json_stream::JsonStreamSink;
use territory_analyzer::PermissionReport;
use territory_provider::RegionTable;

#[derive(Parser, Debug)]
#[command(name = "territory", version, about = "Distributor permission hierarchy")]
struct Cli {
    /// Region reference table (CSV, header row first).
    #[arg(long, global = true, env = "TERRITORY_REGIONS", default_value = "cities.csv")]
    regions: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive menu on stdin.
    Shell,

    /// Execute a command script, one command per line.
    Run {
        script: PathBuf,

        /// Print reports as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Sink output: "ndjson" writes NDJSON to stdout,
        /// "ndjson:/path/to/file" writes to file.
        #[arg(long)]
        sink: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let regions = load_regions(&cli.regions);

    match cli.command {
        Commands::Shell => shell(Session::new(regions)),
        Commands::Run { script, json, sink } => run(Session::new(regions), &script, json, sink),
    }
}

/// A missing or unreadable table is not fatal; reports just lose region names.
fn load_regions(path: &Path) -> RegionTable {
    match RegionTable::load(path) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "region table unavailable");
            RegionTable::new()
        }
    }
}

fn run(
    mut session: Session<RegionTable>,
    script: &Path,
    json: bool,
    sink: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(script)?;
    let mut reports = Vec::new();
    let mut failures = 0usize;

    for (idx, line) in text.lines().enumerate() {
        match session.execute_line(line) {
            Ok(Some(Outcome::Report(report))) => reports.push(report),
            Ok(Some(outcome)) => tracing::debug!(line = idx + 1, ?outcome, "ok"),
            Ok(None) => {}
            Err(e) => {
                failures += 1;
                eprintln!("line {}: {}", idx + 1, e);
            }
        }
    }

    tracing::info!(
        distributors = session.hierarchy.len(),
        reports = reports.len(),
        failures,
        "script complete"
    );

    if let Some(ref sink_spec) = sink {
        let rows: Vec<_> = reports.iter().flat_map(PermissionReport::to_rows).collect();

        if sink_spec == "ndjson" {
            let mut s = JsonStreamSink::stdout();
            s.write_rows(&rows)?;
            let n = s.finish()?;
            tracing::info!(rows = n, "ndjson sink: wrote to stdout");
        } else if let Some(path) = sink_spec.strip_prefix("ndjson:") {
            let file = std::fs::File::create(path)?;
            let mut s = JsonStreamSink::new(file);
            s.write_rows(&rows)?;
            let n = s.finish()?;
            tracing::info!(rows = n, path, "ndjson sink: wrote to file");
        } else {
            eprintln!("Unknown sink: {}. Use 'ndjson' or 'ndjson:/path'", sink_spec);
        }

        // Still print reports to stderr so they're visible.
        for report in &reports {
            eprint!("{}", report.render());
        }
    } else if json {
        let rows: Vec<_> = reports.iter().flat_map(PermissionReport::to_rows).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for report in &reports {
            print!("{}", report.render());
        }
    }

    Ok(())
}

fn shell(mut session: Session<RegionTable>) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("\nSelect an option:");
        println!("1) Create distributor");
        println!("2) Add permission");
        println!("3) Link distributor");
        println!("4) Check permissions");
        println!("5) Check inherited permissions");
        println!("6) Exit");

        let Some(choice) = prompt(&mut input, "Enter choice: ")? else {
            return Ok(());
        };

        let command = match choice.as_str() {
            "1" => prompt(&mut input, "Enter distributor name: ")?.map(Command::Create),
            "2" => {
                let Some(name) = prompt(&mut input, "Enter distributor name: ")? else {
                    return Ok(());
                };
                let Some(kind) = prompt(&mut input, "Enter permission type (include/exclude): ")?
                else {
                    return Ok(());
                };
                prompt(
                    &mut input,
                    "Enter regions (comma-separated, e.g., INDIA, UNITEDSTATES): ",
                )?
                .map(|regions| Command::Add {
                    name,
                    kind,
                    regions: split_regions(&regions),
                })
            }
            "3" => {
                let Some(parent) = prompt(&mut input, "Enter parent distributor: ")? else {
                    return Ok(());
                };
                prompt(&mut input, "Enter child distributor: ")?
                    .map(|child| Command::Link { parent, child })
            }
            "4" => prompt(&mut input, "Enter distributor name to check: ")?.map(Command::Show),
            "5" => prompt(&mut input, "Enter distributor name to check: ")?.map(Command::Inherited),
            "6" => {
                println!("Exiting.");
                return Ok(());
            }
            _ => {
                println!("Invalid choice.");
                continue;
            }
        };

        let Some(command) = command else {
            return Ok(());
        };

        match session.execute(command) {
            Ok(Outcome::Created(name)) => println!("Created distributor {name}"),
            Ok(Outcome::Added { name, count }) => {
                println!("Added {count} permission(s) to {name}")
            }
            Ok(Outcome::Linked { parent, child }) => {
                println!("Successfully linked {child} to {parent}")
            }
            Ok(Outcome::Report(report)) => print!("{}", report.render()),
            Err(e) => println!("Error: {e}"),
        }
    }
}

/// Prints `label`, reads one trimmed line. `None` on end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
