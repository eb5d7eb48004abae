//! Dukkan CLI
//!
//! Command-line driver for the Dukkan client utilities.
//!
//! # Usage
//!
//! ```bash
//! dukkan --help
//! dukkan format-date 2024-01-15T10:30:00Z
//! dukkan validate username ab
//! dukkan log --level warn "Payment slow" --data '{"order_id":"O-1"}'
//! dukkan metric timing checkout_ms 320 --tag route=/checkout
//! ```

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dukkan_shared::chrono::Utc;
use dukkan_shared::config::TelemetryConfig;
use dukkan_shared::format::{format_date, format_date_in, format_time_ago, status_badge, status_color};
use dukkan_shared::models::{Attributes, LogLevel, Tags};
use dukkan_shared::telemetry::{self, Telemetry};
use dukkan_shared::validation::{
    check_email, validate_age, validate_password, validate_username, ValidationResult,
};

/// Dukkan CLI - client utilities from the command line
#[derive(Parser)]
#[command(name = "dukkan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Telemetry ingestion endpoint
    #[arg(short, long, env = "DUKKAN_TELEMETRY_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a timestamp as an Arabic date
    FormatDate {
        /// ISO-8601 timestamp
        input: String,
        /// Render in UTC instead of local time
        #[arg(long)]
        utc: bool,
    },
    /// Format a timestamp as a relative "time ago" phrase
    TimeAgo {
        /// ISO-8601 timestamp
        input: String,
    },
    /// Print the CSS tokens for an open/closed state
    Status {
        /// The state
        #[arg(value_enum)]
        state: StatusState,
    },
    /// Validate a form field and print the result as JSON
    Validate {
        /// The field to validate
        #[arg(value_enum)]
        field: Field,
        /// The value to check
        value: String,
    },
    /// Send a log message through the telemetry facade
    Log {
        /// Log level
        #[arg(short, long, default_value = "info")]
        level: LogLevel,
        /// The message
        message: String,
        /// Context data as a JSON object
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Record a metric through the telemetry facade
    Metric {
        /// Metric primitive
        #[arg(value_enum)]
        kind: MetricCommand,
        /// Metric name
        name: String,
        /// Value (numeric except for sets)
        value: String,
        /// Tag as key=value, repeatable
        #[arg(short, long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Field {
    Email,
    Password,
    Username,
    Age,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetricCommand {
    Increment,
    Gauge,
    Timing,
    Set,
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn validate(field: Field, value: &str) -> Result<ValidationResult> {
    Ok(match field {
        Field::Email => check_email(value),
        Field::Password => validate_password(value),
        Field::Username => validate_username(value),
        Field::Age => {
            let age = value
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Age must be a number, got '{value}'"))?;
            validate_age(age)
        }
    })
}

fn parse_data(data: Option<&str>) -> Result<Option<Attributes>> {
    data.map(|raw| serde_json::from_str::<Attributes>(raw).context("--data must be a JSON object"))
        .transpose()
}

fn parse_number(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Metric value must be a number, got '{value}'"))
}

/// Runs a command and returns what should be printed.
fn run(command: &Commands, telemetry: &Telemetry) -> Result<String> {
    match command {
        Commands::FormatDate { input, utc } => Ok(if *utc {
            format_date_in(input, &Utc)
        } else {
            format_date(input)
        }),
        Commands::TimeAgo { input } => Ok(format_time_ago(input)),
        Commands::Status { state } => {
            let is_open = *state == StatusState::Open;
            Ok(format!("{} {}", status_color(is_open), status_badge(is_open)))
        }
        Commands::Validate { field, value } => {
            let result = validate(*field, value)?;
            Ok(serde_json::to_string(&result)?)
        }
        Commands::Log {
            level,
            message,
            data,
        } => {
            if message.is_empty() {
                bail!("Log message cannot be empty");
            }
            telemetry.log(*level, message, parse_data(data.as_deref())?);
            telemetry.flush();
            Ok(format!("logged at {level}"))
        }
        Commands::Metric {
            kind,
            name,
            value,
            tags,
        } => {
            let tags: Option<Tags> = (!tags.is_empty()).then(|| tags.iter().cloned().collect());
            let metrics = telemetry.metrics();
            match kind {
                MetricCommand::Increment => metrics.increment(name, parse_number(value)?, tags),
                MetricCommand::Gauge => metrics.gauge(name, parse_number(value)?, tags),
                MetricCommand::Timing => metrics.timing(name, parse_number(value)?, tags),
                MetricCommand::Set => metrics.set(name, value.as_str(), tags),
            }
            telemetry.flush();
            Ok(format!("recorded {name}"))
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Dukkan CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for usage information");
        return Ok(());
    };

    let mut config = TelemetryConfig::from_env()?;
    if let Some(endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    telemetry::install(Telemetry::from_config(&config)?)?;

    let output = run(&command, telemetry::global())?;
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dukkan_shared::models::{BreadcrumbLevel, MetricKind, MetricUnit};
    use dukkan_shared::telemetry::InMemoryBackend;
    use std::sync::Arc;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command.unwrap()
    }

    fn facade() -> (Telemetry, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        (Telemetry::new(backend.clone()), backend)
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["dukkan"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_format_date_utc() {
        let (telemetry, _) = facade();
        let command = parse(&["dukkan", "format-date", "--utc", "2024-01-15T10:30:00Z"]);
        assert_eq!(run(&command, &telemetry).unwrap(), "١٥ يناير ٢٠٢٤ في ١٠:٣٠ ص");
    }

    #[test]
    fn test_time_ago_invalid_is_now() {
        let (telemetry, _) = facade();
        let command = parse(&["dukkan", "time-ago", "garbage"]);
        assert_eq!(run(&command, &telemetry).unwrap(), "الآن");
    }

    #[test]
    fn test_status() {
        let (telemetry, _) = facade();
        let command = parse(&["dukkan", "status", "closed"]);
        assert_eq!(run(&command, &telemetry).unwrap(), "text-danger bg-danger");
    }

    #[test]
    fn test_validate_outputs_json() {
        let (telemetry, _) = facade();

        let command = parse(&["dukkan", "validate", "username", "abc"]);
        assert_eq!(run(&command, &telemetry).unwrap(), r#"{"isValid":true}"#);

        let command = parse(&["dukkan", "validate", "age", "15"]);
        let output: serde_json::Value =
            serde_json::from_str(&run(&command, &telemetry).unwrap()).unwrap();
        assert_eq!(output["isValid"], false);
        assert!(output["message"].is_string());
    }

    #[test]
    fn test_validate_fractional_age() {
        let (telemetry, _) = facade();

        let command = parse(&["dukkan", "validate", "age", "15.5"]);
        let output: serde_json::Value =
            serde_json::from_str(&run(&command, &telemetry).unwrap()).unwrap();
        assert_eq!(output["isValid"], false);

        let command = parse(&["dukkan", "validate", "age", "16.5"]);
        assert_eq!(run(&command, &telemetry).unwrap(), r#"{"isValid":true}"#);
    }

    #[test]
    fn test_validate_age_requires_number() {
        let (telemetry, _) = facade();
        let command = parse(&["dukkan", "validate", "age", "old"]);
        assert!(run(&command, &telemetry).is_err());
    }

    #[test]
    fn test_log_command() {
        let (telemetry, backend) = facade();
        let command = parse(&[
            "dukkan",
            "log",
            "--level",
            "warn",
            "Payment slow",
            "--data",
            r#"{"order_id":"O-1"}"#,
        ]);

        run(&command, &telemetry).unwrap();

        let crumbs = backend.breadcrumbs();
        assert_eq!(crumbs.len(), 1);
        assert_eq!(crumbs[0].level, BreadcrumbLevel::Warning);
        assert_eq!(crumbs[0].data["order_id"], "O-1");
    }

    #[test]
    fn test_log_rejects_bad_data() {
        let (telemetry, _) = facade();
        let command = parse(&["dukkan", "log", "hello", "--data", "[1,2]"]);
        assert!(run(&command, &telemetry).is_err());
    }

    #[test]
    fn test_metric_command_with_tags() {
        let (telemetry, backend) = facade();
        let command = parse(&[
            "dukkan", "metric", "timing", "checkout_ms", "320", "--tag", "route=/checkout",
        ]);

        run(&command, &telemetry).unwrap();

        let samples = backend.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].kind, MetricKind::Distribution);
        assert_eq!(samples[0].unit, Some(MetricUnit::Millisecond));
        assert_eq!(samples[0].tags.get("route"), Some(&"/checkout".to_string()));
    }

    #[test]
    fn test_metric_set_accepts_text() {
        let (telemetry, backend) = facade();
        let command = parse(&["dukkan", "metric", "set", "visitors", "user-1"]);

        run(&command, &telemetry).unwrap();

        assert_eq!(backend.samples()[0].value.as_text(), Some("user-1"));
    }

    #[test]
    fn test_bad_tag_rejected() {
        assert!(Cli::try_parse_from(["dukkan", "metric", "gauge", "x", "1", "--tag", "nokey"]).is_err());
    }
}
