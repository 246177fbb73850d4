// crates/search-conformance-cli/src/main.rs
// ============================================================================
// Module: Search Conformance CLI Entry Point
// Description: Command dispatcher for suite runs, catalog listing, and config.
// Purpose: Provide a safe CLI that reports conformance through its exit code.
// Dependencies: clap, search-conformance-{cli,config,core}, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! `search-conformance run` executes the catalog against a live endpoint,
//! prints one line per verdict (or the canonical JSON report), optionally
//! writes report artifacts, and exits successfully only when no blocking
//! verdict failed. Diagnostics go to stderr through `tracing`; stdout is
//! reserved for results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use search_conformance_cli::RunOverrides;
use search_conformance_cli::artifacts::report_json_bytes;
use search_conformance_cli::build_catalog;
use search_conformance_cli::render::PREVIEW_CHARS;
use search_conformance_cli::render::catalog_line;
use search_conformance_cli::render::summary_line;
use search_conformance_cli::render::verdict_line;
use search_conformance_cli::run_suite;
use search_conformance_cli::write_report;
use search_conformance_config::SearchConformanceConfig;
use search_conformance_core::FeatureTag;
use search_conformance_core::Strictness;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "search-conformance", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the conformance suite against a search endpoint.
    Run(RunCommand),
    /// List the scenario catalog.
    List(ListCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
}

/// Output formats for structured CLI commands.
#[derive(ValueEnum, Copy, Clone, Debug, Default)]
enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// Canonical JSON output.
    Json,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Optional config file path (defaults to search-conformance.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Search endpoint override.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
    /// Run only these scenario ids (repeatable).
    #[arg(long = "scenario", value_name = "ID", action = ArgAction::Append)]
    scenarios: Vec<String>,
    /// Run only scenarios with these feature tags (repeatable).
    #[arg(long = "feature", value_name = "TAG", action = ArgAction::Append)]
    features: Vec<String>,
    /// Skip these scenario ids (repeatable).
    #[arg(long = "exclude", value_name = "ID", action = ArgAction::Append)]
    excludes: Vec<String>,
    /// Maximum scenarios in flight.
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,
    /// Directory receiving summary.json and summary.md.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `list`.
#[derive(Args, Debug)]
struct ListCommand {
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// List only scenarios with these feature tags (repeatable).
    #[arg(long = "feature", value_name = "TAG", action = ArgAction::Append)]
    features: Vec<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to search-conformance.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// JSON catalog entry for `list --format json`.
#[derive(Serialize)]
struct CatalogEntry {
    /// Scenario id.
    id: String,
    /// Feature tag.
    feature: FeatureTag,
    /// Strictness.
    strictness: Strictness,
    /// Accepted statuses.
    expected_status: Vec<u16>,
    /// Bounded query preview.
    query: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Installs the stderr subscriber; `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("search-conformance {version}"))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Run(command) => command_run(command).await,
        Commands::List(command) => command_list(&command),
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
        },
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| output_error("stdout", &err))?;
    write_stdout_line("")
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `run` command.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    let overrides = RunOverrides {
        endpoint: command.endpoint,
        scenarios: command.scenarios,
        features: command.features,
        excludes: command.excludes,
        concurrency: command.concurrency,
    };
    overrides.apply(&mut config).map_err(|err| CliError::new(err.to_string()))?;
    let report = run_suite(&config).await.map_err(|err| CliError::new(err.to_string()))?;

    match command.format {
        OutputFormat::Text => {
            for verdict in &report.verdicts {
                write_stdout_line(&verdict_line(verdict))?;
            }
            write_stdout_line(&summary_line(&report))?;
        }
        OutputFormat::Json => {
            let mut bytes =
                report_json_bytes(&report).map_err(|err| CliError::new(err.to_string()))?;
            bytes.push(b'\n');
            write_stdout_bytes(&bytes)?;
        }
    }
    if let Some(dir) = &command.report {
        let paths = write_report(dir, &report).map_err(|err| CliError::new(err.to_string()))?;
        info!(json = %paths.json.display(), markdown = %paths.markdown.display(), "report written");
    }
    Ok(if report.passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes the `list` command.
fn command_list(command: &ListCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    let overrides = RunOverrides {
        features: command.features.clone(),
        ..RunOverrides::default()
    };
    overrides.apply(&mut config).map_err(|err| CliError::new(err.to_string()))?;
    let catalog = build_catalog(&config).map_err(|err| CliError::new(err.to_string()))?;
    match command.format {
        OutputFormat::Text => {
            for scenario in &catalog {
                write_stdout_line(&catalog_line(scenario))?;
            }
        }
        OutputFormat::Json => {
            let entries: Vec<CatalogEntry> = catalog
                .iter()
                .map(|scenario| CatalogEntry {
                    id: scenario.id().to_string(),
                    feature: scenario.query().feature(),
                    strictness: scenario.strictness(),
                    expected_status: scenario.expected_status().to_vec(),
                    query: scenario.query().preview(PREVIEW_CHARS),
                })
                .collect();
            let mut bytes = serde_jcs::to_vec(&entries)
                .map_err(|err| CliError::new(format!("failed to serialize catalog: {err}")))?;
            bytes.push(b'\n');
            write_stdout_bytes(&bytes)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let source = config
        .source
        .as_ref()
        .map_or_else(|| "built-in defaults".to_string(), |path| path.display().to_string());
    write_stdout_line(&format!("config ok ({source})"))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<SearchConformanceConfig> {
    SearchConformanceConfig::load(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| output_error("stdout", &err))
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes).map_err(|err| output_error("stdout", &err))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error.
fn output_error(stream: &str, error: &std::io::Error) -> CliError {
    CliError::new(format!("failed to write to {stream}: {error}"))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
