//! Zonegate
//!
//! Validates DNS resource records from the command line, one at a time or
//! in batches, and prints a JSON report for each.

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use zonegate_config::Config;
use zonegate_validate::{supported_types, validate, RecordInput, ValidationReport};

use crate::logging::{init_tracing, parse_log_level, LogConfig, LogFormat};

/// Zonegate - DNS resource record validation
#[derive(Parser, Debug)]
#[command(name = "zonegate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a single record
    Check {
        /// Record type mnemonic (A, MX, TLSA, ...)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        rtype: String,

        /// Owner name
        #[arg(short, long)]
        name: String,

        /// Record content
        #[arg(long)]
        content: String,

        /// TTL in seconds
        #[arg(long)]
        ttl: Option<String>,

        /// Priority (MX and SRV)
        #[arg(short, long)]
        prio: Option<String>,

        /// TTL used when --ttl is blank
        #[arg(long, value_name = "SECONDS")]
        default_ttl: Option<u32>,
    },

    /// Validate a JSON array of records read from a file ("-" for stdin)
    Batch {
        /// Input file
        file: PathBuf,
    },

    /// List supported record types
    Types,

    /// Validate the configuration file
    Config {
        /// Show the loaded settings
        #[arg(short, long)]
        verbose: bool,
    },
}

/// One record in a batch file.
#[derive(Debug, Deserialize)]
struct BatchEntry {
    #[serde(rename = "type")]
    rtype: String,
    name: String,
    content: String,
    #[serde(default, deserialize_with = "text_or_number")]
    ttl: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    prio: Option<String>,
}

/// Accepts `"300"`, `300` or `null` for TTL and priority.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

/// Find the configuration file in standard locations
fn find_config_file(explicit_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path);
    }

    let search_paths = [
        PathBuf::from("./zonegate.yaml"),
        PathBuf::from("./zonegate.yml"),
        PathBuf::from("/etc/zonegate/config.yaml"),
        dirs::config_dir()
            .map(|p| p.join("zonegate/config.yaml"))
            .unwrap_or_default(),
    ];

    search_paths.into_iter().find(|path| path.is_file())
}

/// Loads the configuration, falling back to defaults when no file exists.
fn load_config(explicit_path: Option<PathBuf>) -> Result<Config> {
    let config = match find_config_file(explicit_path) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Initialize logging
fn init_logging(config: &Config, cli_level: Option<&str>, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        parse_log_level(cli_level.unwrap_or(&config.logging.level))
    };

    init_tracing(&LogConfig {
        level,
        format: LogFormat::parse(&config.logging.format),
    });
}

fn check_record(config: &Config, rtype: &str, input: &RecordInput<'_>) -> ValidationReport {
    ValidationReport::from(validate(rtype, input, &config.dns))
}

fn run_check(
    config: &Config,
    rtype: &str,
    name: &str,
    content: &str,
    ttl: Option<&str>,
    prio: Option<&str>,
    default_ttl: Option<u32>,
) -> Result<bool> {
    let input = RecordInput {
        name,
        content,
        priority: prio,
        ttl,
        default_ttl: default_ttl.unwrap_or(config.dns.default_ttl),
    };

    let report = check_record(config, rtype, &input);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.valid)
}

fn read_batch(path: &Path) -> Result<Vec<BatchEntry>> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid batch file {}", path.display()))
}

fn run_batch(config: &Config, path: &Path) -> Result<bool> {
    let entries = read_batch(path)?;
    info!(records = entries.len(), "validating batch");

    let reports: Vec<ValidationReport> = entries
        .iter()
        .map(|entry| {
            let input = RecordInput {
                name: &entry.name,
                content: &entry.content,
                priority: entry.prio.as_deref(),
                ttl: entry.ttl.as_deref(),
                default_ttl: config.dns.default_ttl,
            };
            check_record(config, &entry.rtype, &input)
        })
        .collect();

    let rejected = reports.iter().filter(|r| !r.valid).count();
    debug!(records = reports.len(), rejected, "batch complete");

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(rejected == 0)
}

fn print_types() {
    println!("{}", style("Supported record types:").cyan().bold());
    for rtype in supported_types() {
        println!(
            "  {} {:>5}  {}",
            style(format!("{:<11}", rtype.name())).green(),
            rtype.to_u16(),
            style(rtype.description()).dim()
        );
    }
}

fn show_config(config_path: Option<PathBuf>, verbose: bool) -> Result<()> {
    let Some(path) = find_config_file(config_path) else {
        println!("{}", style("No configuration file found, using defaults").yellow());
        return Ok(());
    };

    println!("Validating configuration: {}", path.display());
    let config = load_config(Some(path))?;

    if verbose {
        let dns = &config.dns;
        println!("\n{}", style("Configuration loaded:").green().bold());
        println!("  Default TTL: {}", dns.default_ttl);
        println!("  Max content length: {}", dns.max_content_length);
        println!("  Allow underscore: {}", dns.hostname.allow_underscore);
        println!("  Allow wildcard: {}", dns.hostname.allow_wildcard);
        println!("  Top-level TLD check: {}", dns.hostname.top_level_tld_check);
        println!("  Strict TLD check: {}", dns.hostname.strict_tld_check);
        println!("  Known TLDs: {}", dns.hostname.valid_tlds.len());
        println!("  Log level: {}", config.logging.level);
    }

    println!("{}", style("Configuration is valid!").green().bold());
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Commands::Config { verbose } = cli.command {
        show_config(cli.config, verbose)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(cli.config.clone())?;
    init_logging(&config, cli.log_level.as_deref(), cli.quiet);

    let accepted = match &cli.command {
        Commands::Check {
            rtype,
            name,
            content,
            ttl,
            prio,
            default_ttl,
        } => run_check(
            &config,
            rtype,
            name,
            content,
            ttl.as_deref(),
            prio.as_deref(),
            *default_ttl,
        )?,
        Commands::Batch { file } => run_batch(&config, file)?,
        Commands::Types => {
            print_types();
            true
        }
        Commands::Config { .. } => true,
    };

    Ok(if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
