//! perf-heatmap CLI
//!
//! Builds line-level heat indexes from CPU profiles and prints
//! or exports them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use perf_heatmap::commands::{
    execute_json, execute_stat, validate_json_args, validate_stat_args, JsonArgs, StatArgs,
};
use perf_heatmap::output::ValueFormat;
use perf_heatmap::utils::config::DEFAULT_THRESHOLD;

/// perf-heatmap - line-level heat levels for CPU profiles
#[derive(Parser, Debug)]
#[command(name = "perf-heatmap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print index size and every indexed line
    Stat {
        /// Path to the profile JSON file
        profile: PathBuf,

        /// Fraction of each function's lines that get a heat level
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Only show functions whose file name matches this regex
        #[arg(long)]
        filename: Option<String>,

        /// Prefix stripped from file paths
        #[arg(long, env = "PERF_HEATMAP_TRIM_PREFIX")]
        trim_prefix: Option<String>,
    },

    /// Export hot lines as JSON
    Json {
        /// Path to the profile JSON file
        profile: PathBuf,

        /// Fraction of each function's lines that get a heat level
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Unit of exported values
        #[arg(long, default_value = "cpu/microseconds")]
        value_format: ValueFormat,

        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prefix stripped from file paths
        #[arg(long, env = "PERF_HEATMAP_TRIM_PREFIX")]
        trim_prefix: Option<String>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Stat {
            profile,
            threshold,
            filename,
            trim_prefix,
        } => {
            let args = StatArgs {
                profile,
                threshold,
                file_filter: filename,
                trim_prefix,
            };

            validate_stat_args(&args)?;
            execute_stat(&args, &mut std::io::stdout().lock())?;
        }

        Commands::Json {
            profile,
            threshold,
            value_format,
            output,
            trim_prefix,
        } => {
            let args = JsonArgs {
                profile,
                threshold,
                value_format,
                output,
                trim_prefix,
            };

            validate_json_args(&args)?;
            execute_json(&args, std::io::stdout().lock())?;
        }
    }

    Ok(())
}
