use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use driver_rank::activity::{count_work_days, window_start, ActivityEvent, JobSpan, DEFAULT_WINDOW};
use driver_rank::config::{get_config_path, load_config, write_config, Config};
use driver_rank::output;
use driver_rank::request::{handle_request, Request, Response};
use driver_rank::roster::{
    apply_events, apply_work_days, biannual_normalization, leaderboard, load_roster, save_roster,
    NormalizationOutcome,
};
use driver_rank::scoring::{calculate_score, validate_scoring, ScoringConfig, ScoringError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_IO: i32 = 1;
const EXIT_REJECTED: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one JSON request (default if no subcommand)
    Score {
        /// Read the request from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print how a single driver's score was reached to stderr
        #[arg(long)]
        explain: bool,
    },
    /// Show the leaderboard of a roster, or normalize it
    Roster {
        /// JSON array of drivers with their metrics
        file: PathBuf,

        /// Number of drivers to show (defaults to leaderboard_size or 10)
        #[arg(long)]
        top: Option<usize>,

        /// Run the biannual normalization over the whole roster
        #[arg(long)]
        biannual: bool,

        /// Tab-separated output for scripting
        #[arg(long, conflicts_with = "json")]
        tsv: bool,

        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Count work days per driver from job spans
    WorkDays {
        /// JSON array of job spans
        file: PathBuf,

        /// Look-back window, e.g. "30d" (defaults to work_day_window or 30d)
        #[arg(long)]
        window: Option<String>,

        /// Fold the counts into this roster as work rates and rescore each driver
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Write the updated roster back to its file
        #[arg(long, requires = "roster")]
        in_place: bool,
    },
    /// Apply job, feedback and cancellation events to a roster
    Record {
        /// JSON array of drivers with their metrics
        roster: PathBuf,

        /// JSON array of events
        events: PathBuf,

        /// Recompute the average of every driver an event touched
        #[arg(long)]
        rescore: bool,

        /// Write the updated roster back to its file instead of printing it
        #[arg(long)]
        in_place: bool,
    },
    /// Write the default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "driver-rank")]
#[command(about = "Driver ranking scores and biannual normalization", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/driver-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    driver_rank::logging::init(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Score {
        input: None,
        explain: false,
    });

    let init_only = matches!(command, Commands::InitConfig { .. });
    let config = if init_only {
        Config::default()
    } else {
        match load_config(cli.config.clone()) {
            Ok(c) => c,
            Err(e) => {
                error!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = validate_scoring(&scoring) {
        error!("Scoring config errors:");
        for e in errors {
            error!("  - {}", e);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let outcome = match command {
        Commands::Score { input, explain } => run_score(input.as_deref(), explain, &scoring),
        Commands::Roster {
            file,
            top,
            biannual,
            tsv,
            json,
        } => run_roster(&file, top.or(config.leaderboard_size), biannual, tsv, json, &scoring),
        Commands::WorkDays {
            file,
            window,
            roster,
            in_place,
        } => run_work_days(&file, window, roster.as_deref(), in_place, &config),
        Commands::Record {
            roster,
            events,
            rescore,
            in_place,
        } => run_record(&roster, &events, rescore, in_place, &scoring),
        Commands::InitConfig { force } => run_init_config(cli.config, force),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            let code = if e.downcast_ref::<ScoringError>().is_some() {
                EXIT_REJECTED
            } else {
                EXIT_IO
            };
            std::process::exit(code);
        }
    }
}

fn read_body(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file at {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request from stdin")?;
            Ok(body)
        }
    }
}

fn run_score(input: Option<&Path>, explain: bool, scoring: &ScoringConfig) -> Result<i32> {
    let body = read_body(input)?;

    let response = match Request::parse(&body) {
        Ok(request) => {
            if explain {
                explain_request(&request, scoring);
            }
            handle_request(&request, scoring).unwrap_or_else(|e| {
                warn!(kind = e.kind(), "request rejected: {}", e);
                Response::from(&e)
            })
        }
        Err(e) => {
            warn!(kind = e.kind(), "request rejected: {}", e);
            Response::from(&e)
        }
    };

    let json = serde_json::to_string(&response).context("Failed to serialize response")?;
    println!("{}", json);

    Ok(if response.is_error() {
        EXIT_REJECTED
    } else {
        EXIT_SUCCESS
    })
}

fn explain_request(request: &Request, scoring: &ScoringConfig) {
    match request {
        Request::Single(entry) => {
            if let Ok(result) = calculate_score(&entry.metrics, entry.mode(), scoring) {
                eprintln!("{}", output::format_breakdown(&result, scoring.precision()));
            }
        }
        Request::Batch(_) => warn!("--explain only applies to single-driver requests"),
    }
}

fn run_roster(
    file: &Path,
    top: Option<usize>,
    biannual: bool,
    tsv: bool,
    json: bool,
    scoring: &ScoringConfig,
) -> Result<i32> {
    let roster = load_roster(file)?;
    debug!(drivers = roster.len(), "roster loaded");
    let use_colors = output::should_use_colors();

    if biannual {
        match biannual_normalization(&roster, scoring) {
            NormalizationOutcome::Normalized(assignments) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&assignments)?);
                } else {
                    println!("{}", output::format_assignments(&assignments, scoring.precision(), use_colors));
                }
            }
            NormalizationOutcome::NotEnoughDrivers => {
                println!("Not enough drivers for normalization");
            }
        }
        return Ok(EXIT_SUCCESS);
    }

    let top_drivers = leaderboard(&roster, top);
    if json {
        println!("{}", serde_json::to_string_pretty(&top_drivers)?);
    } else if tsv {
        println!("{}", output::format_tsv(&top_drivers));
    } else {
        println!("{}", output::format_leaderboard(&top_drivers, scoring.precision(), use_colors));
    }
    Ok(EXIT_SUCCESS)
}

fn run_work_days(
    file: &Path,
    window: Option<String>,
    roster_path: Option<&Path>,
    in_place: bool,
    config: &Config,
) -> Result<i32> {
    let window = window
        .or_else(|| config.work_day_window.clone())
        .unwrap_or_else(|| DEFAULT_WINDOW.to_string());
    let since = window_start(chrono::Utc::now(), &window)?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read job spans at {}", file.display()))?;
    let spans: Vec<JobSpan> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse job spans: invalid JSON in {}", file.display()))?;

    let totals = count_work_days(&spans, since);
    info!(
        drivers = totals.len(),
        spans = spans.len(),
        since = %since,
        "work days counted"
    );

    let Some(roster_path) = roster_path else {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(EXIT_SUCCESS);
    };

    let scoring = config.scoring.clone().unwrap_or_default();
    let mut roster = load_roster(roster_path)?;
    let updates = apply_work_days(&mut roster, &totals, &scoring);
    if in_place {
        save_roster(roster_path, &roster)?;
    }
    println!("{}", serde_json::to_string_pretty(&updates)?);
    Ok(EXIT_SUCCESS)
}

fn run_record(
    roster_path: &Path,
    events_path: &Path,
    rescore: bool,
    in_place: bool,
    scoring: &ScoringConfig,
) -> Result<i32> {
    let mut roster = load_roster(roster_path)?;
    let content = std::fs::read_to_string(events_path)
        .with_context(|| format!("Failed to read events at {}", events_path.display()))?;
    let events: Vec<ActivityEvent> = serde_json::from_str(&content).with_context(|| {
        format!("Failed to parse events: invalid JSON in {}", events_path.display())
    })?;

    let applied = apply_events(&mut roster, &events, scoring, rescore)?;
    if in_place {
        save_roster(roster_path, &roster)?;
        println!("Applied {} events to {}", applied, roster_path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&roster)?);
    }
    Ok(EXIT_SUCCESS)
}

fn run_init_config(path: Option<PathBuf>, force: bool) -> Result<i32> {
    let path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if let Err(e) = write_config(&path, &Config::with_defaults(), force) {
        error!("{:#}", e);
        return Ok(EXIT_CONFIG);
    }
    println!("Wrote default config to {}", path.display());
    Ok(EXIT_SUCCESS)
}
