// vinvegan - find vegan-friendly producers in a retailer's product catalog

mod catalog;
mod dupes;
mod exit_codes;
mod matching;
mod names;
mod policy;
mod report;
mod urls;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{io_exit_code, match_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "vinvegan")]
#[command(about = "Match a vegan producer registry against a retailer's product catalog")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Match policy file (default: ./vinvegan.toml, then the user config dir)
    #[arg(long, global = true, env = "VINVEGAN_CONFIG")]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug detail (progress, derived stopwords, filtered rows)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match registry companies against the retailer export and write the results
    #[command(after_help = "\
Examples:
  vinvegan match wine.json produkter.csv
  vinvegan match wine.json produkter.csv --out-dir results --html results/index.html
  vinvegan match wine.json produkter.csv --json > result.json")]
    Match {
        /// Registry export (JSON)
        registry: PathBuf,

        /// Retailer product export (CSV)
        retailer: PathBuf,

        /// Directory for the per-category result files
        #[arg(long, short = 'o', default_value = ".")]
        out_dir: PathBuf,

        /// Also render the HTML report to this file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print the full match result as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// List companies that appear to be listed twice in a catalog
    #[command(after_help = "\
Examples:
  vinvegan dupes --registry wine.json
  vinvegan dupes --retailer produkter.csv --threshold 0.95
  vinvegan dupes --registry wine.json --retailer produkter.csv --json")]
    Dupes {
        /// Registry export (JSON)
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Retailer product export (CSV)
        #[arg(long)]
        retailer: Option<PathBuf>,

        /// Similarity a pair must exceed (default from policy)
        #[arg(long)]
        threshold: Option<f64>,

        /// Print reports as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Render the HTML report from previously written result files
    #[command(after_help = "\
Examples:
  vinvegan report
  vinvegan report --dir results --output results/index.html")]
    Report {
        /// Directory holding the result files written by `match`
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show canonical names and search keys
    #[command(after_help = "\
Examples:
  vinvegan normalize \"Azienda Agricola Foradori\"
  vinvegan normalize \"Château Montelena Winery\" \"Bodegas Torres S.A.\" --json")]
    Normalize {
        /// Company names
        #[arg(required = true)]
        names: Vec<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the spellings a company may be listed under at the retailer
    #[command(after_help = "\
Examples:
  vinvegan variants \"Frog's Leap Winery\"")]
    Variants {
        /// Company names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Report registry companies whose website is missing or unreachable
    #[command(after_help = "\
Examples:
  vinvegan check-urls wine.json
  vinvegan check-urls wine.json --timeout 5 --strict")]
    CheckUrls {
        /// Registry export (JSON)
        registry: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 15)]
        timeout: u64,

        /// Exit non-zero when any website is missing or unreachable
        #[arg(long)]
        strict: bool,
    },

    /// Inspect the match policy
    #[command(subcommand)]
    Config(policy::ConfigCommands),
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  vinvegan-match ", env!("CARGO_PKG_VERSION"),
        "\nbuild:   ", env!("BUILD_PROFILE"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: vinvegan <command> [options]");
            eprintln!("       vinvegan --help for more information");
            Ok(())
        }
        Some(Commands::Match { registry, retailer, out_dir, html, json }) => {
            matching::cmd_match(config, registry, retailer, out_dir, html, json)
        }
        Some(Commands::Dupes { registry, retailer, threshold, json }) => {
            dupes::cmd_dupes(config, registry, retailer, threshold, json)
        }
        Some(Commands::Report { dir, output }) => report::cmd_report(config, dir, output),
        Some(Commands::Normalize { names, json }) => names::cmd_normalize(config, names, json),
        Some(Commands::Variants { names }) => names::cmd_variants(config, names),
        Some(Commands::CheckUrls { registry, timeout, strict }) => {
            urls::cmd_check_urls(registry, timeout, strict)
        }
        Some(Commands::Config(command)) => policy::cmd_config(config, command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<vinvegan_io::IoError> for CliError {
    fn from(err: vinvegan_io::IoError) -> Self {
        let code = io_exit_code(&err);
        let hint = match &err {
            vinvegan_io::IoError::MissingColumn { .. } => {
                Some("column names are configured under [retailer.columns]".to_string())
            }
            vinvegan_io::IoError::Delimiter(_) => {
                Some("set [retailer] delimiter to a single ASCII character".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<vinvegan_match::MatchError> for CliError {
    fn from(err: vinvegan_match::MatchError) -> Self {
        Self::new(match_exit_code(&err), err.to_string())
    }
}
