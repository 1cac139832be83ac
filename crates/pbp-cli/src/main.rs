#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use pbp_core::config::resolve_config;
use pbp_core::{ErrorCode, timing};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pbp: play-by-play event-stream enrichment",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit a stage timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (defaults to $PBP_CONFIG, then the user config dir).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Enrich a play-by-play feed",
        long_about = "Merge split records, link events within periods, snapshot foul state \
                      and label free throw trips, then print the enriched stream.",
        after_help = "EXAMPLES:\n    # Enrich a game and read it\n    pbp enrich game.json\n\n    # Emit machine-readable output\n    pbp enrich game.json --json\n\n    # Use a narrower correlation window\n    pbp enrich game.json --config tight.toml"
    )]
    Enrich(cmd::enrich::EnrichArgs),

    #[command(
        about = "Summarize what enrichment did to a feed",
        long_about = "Run the enrichment pipeline and report merge counts and events per period.",
        after_help = "EXAMPLES:\n    # Summary for a game\n    pbp summary game.json\n\n    # With stage timings\n    pbp summary game.json --timing"
    )]
    Summary(cmd::summary::SummaryArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("PBP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "pbp=debug,info"
        } else {
            "pbp=info,warn"
        })
    });

    let format = env::var("PBP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    let output = cli.output_mode();
    let config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            let code = ErrorCode::ConfigParseError;
            render_error(
                output,
                &CliError::with_details(format!("{err:#}"), code.hint(), code.code()),
            )?;
            return Err(err);
        }
    };
    debug!(?config, "resolved config");

    let command_result = match &cli.command {
        Commands::Enrich(args) => cmd::enrich::run_enrich(args, &config, output),
        Commands::Summary(args) => cmd::summary::run_summary(args, &config, output),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    command_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_flag_parses_before_and_after_subcommand() {
        let cli = Cli::parse_from(["pbp", "--timing", "enrich", "game.json"]);
        assert!(cli.timing);
        let cli = Cli::parse_from(["pbp", "summary", "game.json", "--timing"]);
        assert!(cli.timing);
    }

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["pbp", "enrich", "game.json", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["pbp", "--format", "text", "summary", "game.json"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["pbp", "enrich", "game.json", "--config", "pbp.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("pbp.toml")));
    }

    #[test]
    fn subcommands_take_a_file() {
        let cli = Cli::parse_from(["pbp", "enrich", "game.json"]);
        assert!(matches!(
            cli.command,
            Commands::Enrich(cmd::enrich::EnrichArgs { ref file }) if file == &PathBuf::from("game.json")
        ));
        assert!(Cli::try_parse_from(["pbp", "summary"]).is_err());
    }
}
