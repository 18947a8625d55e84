//! Attendance scoring CLI
//!
//! The `attendance` command runs the scoring engine over JSON inputs.
//!
//! ## Commands
//!
//! - `score`: Score one arrival against one session window
//! - `aggregate`: Combine weighted session results into a cumulative score
//! - `delta`: Compute the incremental change from one new session
//! - `evaluate`: Score a whole event roster from an event file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use attendance_core::{
    aggregate, delta, evaluate_event, score, AggregationMode, ArrivalEvent, AttendanceRecord,
    CumulativeScore, EngineSettings, EventAggregationConfig, EventId, EventReport,
    ScheduledSession, SessionScore, SessionWindow, SkipOverride, SkipOverrides,
    WeightedSessionResult, METRICS,
};

#[derive(Parser)]
#[command(name = "attendance")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Attendance scoring and aggregation engine", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Settings file (TOML); falls back to ATTENDANCE_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one arrival against one session window
    Score {
        /// Session start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,

        /// Session end (RFC 3339)
        #[arg(long)]
        end: DateTime<Utc>,

        /// Arrival time (RFC 3339)
        #[arg(long)]
        arrival: DateTime<Utc>,

        /// Pre-computed duration in minutes (default: end - start)
        #[arg(long)]
        duration: Option<f64>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Aggregate weighted session results from a JSON array
    Aggregate {
        /// JSON file: [{"duration_minutes": .., "percentage": ..}, ...]
        input: PathBuf,

        /// Measure against a weekly quota of minutes instead of session totals
        #[arg(long)]
        weekly_minimum: Option<f64>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change in cumulative percentage from one new session
    Delta {
        /// Percentage earned in the new session
        #[arg(long)]
        percentage: f64,

        /// Duration of the new session in minutes
        #[arg(long)]
        duration: f64,

        /// Cumulative percentage before the new session
        #[arg(long, default_value = "0")]
        previous_cumulative: f64,

        /// Earned minutes before the new session
        #[arg(long, default_value = "0")]
        previous_weighted_sum: f64,

        /// Denominator in force: the weekly quota or the running duration total
        #[arg(long)]
        total_minutes: f64,
    },

    /// Evaluate every user's standing in an event file
    Evaluate {
        /// JSON event file with sessions, records and overrides
        input: PathBuf,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Event file accepted by `evaluate`.
#[derive(Debug, Deserialize)]
struct EventInput {
    event_id: EventId,
    /// Falls back to the `[aggregation]` settings when absent.
    #[serde(default)]
    config: Option<EventAggregationConfig>,
    sessions: Vec<ScheduledSession>,
    #[serde(default)]
    records: Vec<AttendanceRecord>,
    #[serde(default)]
    overrides: Vec<SkipOverride>,
}

#[derive(Debug, Serialize)]
struct DeltaOutput {
    delta: f64,
    cumulative: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings =
        EngineSettings::load(cli.config.as_deref()).context("Failed to load settings")?;
    attendance_core::init_from_settings(&settings.logging, cli.json, cli.verbose);

    let result = match cli.command {
        Commands::Score {
            start,
            end,
            arrival,
            duration,
            format,
        } => cmd_score(start, end, arrival, duration, format),
        Commands::Aggregate {
            input,
            weekly_minimum,
            format,
        } => cmd_aggregate(&input, weekly_minimum, &settings, format),
        Commands::Delta {
            percentage,
            duration,
            previous_cumulative,
            previous_weighted_sum,
            total_minutes,
        } => cmd_delta(
            percentage,
            duration,
            previous_cumulative,
            previous_weighted_sum,
            total_minutes,
        ),
        Commands::Evaluate { input, format } => cmd_evaluate(&input, &settings, format),
    };

    METRICS.flush();
    result
}

fn cmd_score(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    arrival: DateTime<Utc>,
    duration: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let window = build_window(start, end, duration)?;
    let session_score = score(&window, &ArrivalEvent::at(arrival));
    info!(
        late_minutes = window.late_minutes(&ArrivalEvent::at(arrival)),
        percentage = session_score.percentage,
        "session scored"
    );
    print_output(&session_score, format, render_session_score)
}

fn build_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration: Option<f64>,
) -> Result<SessionWindow> {
    let window = match duration {
        Some(minutes) => SessionWindow::with_duration(start, end, minutes),
        None => SessionWindow::new(start, end),
    };
    window.context("Invalid session window")
}

fn cmd_aggregate(
    input: &Path,
    weekly_minimum: Option<f64>,
    settings: &EngineSettings,
    format: OutputFormat,
) -> Result<()> {
    let results: Vec<WeightedSessionResult> = read_json_file(input)?;
    for (index, result) in results.iter().enumerate() {
        result
            .validate()
            .with_context(|| format!("Invalid session result at index {}", index))?;
    }
    let config = match weekly_minimum {
        Some(minimum) => EventAggregationConfig::weekly(minimum),
        None => settings.aggregation,
    };
    config.validate().context("Invalid aggregation config")?;

    let cumulative = aggregate(&results, &config);
    info!(
        sessions = results.len(),
        percentage = cumulative.percentage,
        "cumulative computed"
    );
    print_output(&cumulative, format, |c| render_cumulative(c, &config))
}

fn cmd_delta(
    percentage: f64,
    duration: f64,
    previous_cumulative: f64,
    previous_weighted_sum: f64,
    total_minutes: f64,
) -> Result<()> {
    let change = delta(
        percentage,
        duration,
        previous_cumulative,
        previous_weighted_sum,
        total_minutes,
    );
    let output = DeltaOutput {
        delta: change,
        cumulative: previous_cumulative + change,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_evaluate(input: &Path, settings: &EngineSettings, format: OutputFormat) -> Result<()> {
    let event: EventInput = read_json_file(input)?;
    let report = evaluate_input(&event, settings)?;
    print_output(&report, format, render_report)
}

fn evaluate_input(event: &EventInput, settings: &EngineSettings) -> Result<EventReport> {
    let config = event.config.unwrap_or(settings.aggregation);
    config.validate().context("Invalid aggregation config")?;
    for session in &event.sessions {
        session
            .window
            .validate()
            .with_context(|| format!("Invalid window for session {}", session.session_id))?;
    }
    let overrides: SkipOverrides = event.overrides.iter().collect();

    Ok(evaluate_event(
        event.event_id,
        &event.sessions,
        &event.records,
        &config,
        &overrides,
    ))
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn print_output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    render: impl Fn(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", render(value)),
    }
    Ok(())
}

fn render_session_score(s: &SessionScore) -> String {
    format!("Session score: {:.2}%", s.percentage)
}

fn render_mode(config: &EventAggregationConfig) -> String {
    match config.mode() {
        AggregationMode::Constrained { quota_minutes } => {
            format!("weekly quota of {} min", quota_minutes)
        }
        AggregationMode::Unconstrained => "weighted average".to_string(),
    }
}

fn render_cumulative(c: &CumulativeScore, config: &EventAggregationConfig) -> String {
    format!("Cumulative: {:.2}% ({})", c.percentage, render_mode(config))
}

fn render_report(report: &EventReport) -> String {
    let mut lines = vec![format!(
        "Event {} ({}), {} user(s)",
        report.event_id,
        render_mode(&report.config),
        report.users.len()
    )];
    for standing in &report.users {
        let marker = if standing.cumulative.is_overridden() {
            " [skip]"
        } else {
            ""
        };
        lines.push(format!(
            "  {}  {:>6.2}%{}  sessions={} ignored={}",
            standing.user_id,
            standing.cumulative.percentage,
            marker,
            standing.sessions.len(),
            standing.ignored_records,
        ));
    }
    lines.join("\n")
}
