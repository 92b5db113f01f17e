//! CLI entry point for ferox-map.
//!
//! Reads feroxbuster output, rebuilds the discovered directory tree of the
//! target and flags interesting files.
//!
//! # Usage
//!
//! ```bash
//! ferox-map [OPTIONS] <COMMAND>
//!
//! # Totals, rejected lines and interesting files
//! ferox-map summary --input scan.txt
//!
//! # Indented tree, two levels deep
//! ferox-map tree --input scan.txt --max-depth 2
//!
//! # Machine-readable report, accepting redirects too
//! ferox-map report --input scan.txt --status 200,301 --format csv --output scan.csv
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod render;

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use fm_core::Config;
use fm_tree::{Pipeline, Report};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Turns feroxbuster output into a classified directory tree.
#[derive(Parser)]
#[command(name = "ferox-map", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Feroxbuster output file to read.
    #[arg(short, long, global = true, env = "FEROX_MAP_INPUT")]
    input: Option<Utf8PathBuf>,

    /// JSON configuration file.
    #[arg(short, long, global = true, env = "FEROX_MAP_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Accepted status codes, comma separated (overrides the config file).
    #[arg(long, global = true, value_delimiter = ',')]
    status: Vec<u16>,

    /// Base URL to reduce against instead of detecting it.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show totals, rejected lines and interesting files.
    Summary {
        /// Also show per-directory counts and tree conflicts.
        #[arg(short, long)]
        detailed: bool,
    },

    /// Print the directory tree.
    Tree {
        /// Deepest level to print below the root.
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Generate a machine-readable report.
    Report {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
}

/// Report output format.
#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// JSON format.
    Json,
    /// CSV format.
    Csv,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional config file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => Config::default(),
    };

    if !cli.status.is_empty() {
        config.parse.accepted_status_codes = cli.status.iter().copied().collect();
    }
    if let Some(base_url) = &cli.base_url {
        config.parse.base_url = Some(base_url.clone());
    }
    if let Commands::Tree {
        max_depth: Some(depth),
    } = cli.command
    {
        config.report.max_depth = Some(depth);
    }

    Ok(config)
}

/// Reads the input file and runs the pipeline over it.
///
/// Invalid UTF-8 is replaced rather than rejected, so one bad byte only
/// costs the line it is on.
///
/// # Errors
///
/// Returns an error if no input was given, it cannot be read, or it holds
/// no usable line.
fn load_report(cli: &Cli, config: &Config) -> color_eyre::Result<Report> {
    let input = cli
        .input
        .as_deref()
        .ok_or_else(|| eyre!("No input file given (use --input or FEROX_MAP_INPUT)"))?;
    let pipeline = Pipeline::new(config)?;

    info!(input = %input, "Reading scanner output");
    let bytes = read_input(input)?;
    let text = String::from_utf8_lossy(&bytes);

    let report = pipeline
        .run(text.lines())
        .wrap_err_with(|| format!("Failed to process {input}"))?;
    info!(
        base_url = %report.base_url,
        dirs = report.summary.total_dirs,
        files = report.summary.total_files,
        "Processed scanner output"
    );
    Ok(report)
}

fn read_input(path: &Utf8Path) -> color_eyre::Result<Vec<u8>> {
    if !path.exists() {
        return Err(eyre!("Input file does not exist: {path}"));
    }
    std::fs::read(path.as_std_path()).wrap_err_with(|| format!("Failed to read {path}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Writes rendered text to stdout with a final newline.
fn print(text: &str) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{text}")?;
    Ok(())
}

/// Prints the run summary.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
fn run_summary(report: &Report, detailed: bool) -> color_eyre::Result<()> {
    print(&render::render_summary(report, detailed))
}

/// Prints the directory tree.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
fn run_tree(report: &Report, config: &Config) -> color_eyre::Result<()> {
    print(&render::render_tree(&report.tree, config.report))
}

/// Generates a report in the specified format.
///
/// # Arguments
///
/// * `report` - The pipeline output
/// * `format` - Output format (JSON or CSV)
/// * `output` - Output file path (stdout if None)
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
fn run_report(
    report: &Report,
    format: ReportFormat,
    output: Option<&Utf8Path>,
) -> color_eyre::Result<()> {
    let content = match format {
        ReportFormat::Json => render::json_report(report)
            .map_err(|e| eyre!("Failed to serialize JSON: {e}"))?,
        ReportFormat::Csv => render::csv_report(report),
    };

    if let Some(output_path) = output {
        std::fs::write(output_path.as_std_path(), format!("{content}\n"))
            .wrap_err_with(|| format!("Failed to write {output_path}"))?;
        info!(path = %output_path, "Report written");
        Ok(())
    } else {
        print(&content)
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Load configuration and run the pipeline once for every command
    let config = build_config(&cli)?;
    let report = load_report(&cli, &config)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Summary { detailed } => run_summary(&report, *detailed),
        Commands::Tree { .. } => run_tree(&report, &config),
        Commands::Report { format, output } => run_report(&report, *format, output.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_status_list_overrides_config() {
        let cli = Cli::parse_from([
            "ferox-map",
            "summary",
            "--status",
            "200,301,403",
            "--base-url",
            "https://target.local",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.parse.accepted_status_codes.as_slice(), &[200, 301, 403]);
        assert_eq!(config.parse.base_url.as_deref(), Some("https://target.local"));
    }

    #[test]
    fn test_tree_depth_reaches_report_config() {
        let cli = Cli::parse_from(["ferox-map", "tree", "--max-depth", "2"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.report.max_depth, Some(2));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let cli = Cli::parse_from(["ferox-map", "summary", "--input", "/nonexistent/scan.txt"]);
        let err = load_report(&cli, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_invalid_utf8_only_costs_its_line() {
        let clean = "\
200      GET     1234l      10w     512c http://h/app/config.php
200      GET     1234l      10w     256c http://h/app/Config.php
200      GET      900l       6w     300c http://h/app/readme.txt
";
        let mut bytes = b"\xff\xfe\xff\xff\n".to_vec();
        bytes.extend_from_slice(clean.as_bytes());
        bytes.extend_from_slice(b"\xff\xff\xff\n");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["ferox-map", "summary", "--input", path]);
        let config = build_config(&cli).unwrap();
        let report = load_report(&cli, &config).unwrap();
        let expected = Pipeline::new(&config).unwrap().run(clean.lines()).unwrap();

        assert_eq!(report.tree.to_nested(), expected.tree.to_nested());
        assert_eq!(report.summary, expected.summary);
        assert_eq!(report.stats.rejected_no_url, 2);
        assert_eq!(report.stats.records_parsed, 3);
    }
}
