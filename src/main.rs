use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prayerq::output;
use prayerq::query::{CompiledQuery, QueryCache, compile, evaluate, tokenize};
use prayerq::record::{self, PrayerRecord, Status};
use prayerq::utils::{AppConfig, hours_window};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prayerq")]
#[command(about = "Smart search for family prayer-request logs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (when no subcommand is given)
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Prayer records file (JSON array)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Config file (defaults to config.json in the app data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, global = true)]
    color: ColorArg,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the prayer list with a query
    Search {
        /// Query; empty lists every record
        query: Vec<String>,

        /// Only show records with this status
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,

        /// Print matching records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a query is tokenized and compiled
    Explain {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Check whether any request was made recently
    Recent {
        /// Window in hours (defaults to the configured window)
        #[arg(long)]
        hours: Option<u64>,
    },
    /// Read queries from stdin, one per line, and print matches for each
    Repl,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    All,
    Current,
    Answered,
}

impl StatusArg {
    fn allows(self, status: Status) -> bool {
        match self {
            StatusArg::All => true,
            StatusArg::Current => status == Status::Current,
            StatusArg::Answered => status == Status::Answered,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = load_config(cli.config.as_deref())?;
    let color = ColorChoice::from(cli.color);

    match cli.command {
        Some(Commands::Search {
            query,
            status,
            json,
        }) => {
            let records = open_records(cli.file.as_deref(), &config)?;
            run_search(&records, &query.join(" "), status, json, color)?;
        }
        Some(Commands::Explain { query }) => {
            let tokens = tokenize(&query.join(" "));
            let expr = compile(&tokens);
            output::print_explain(&tokens, expr.as_ref(), color)?;
        }
        Some(Commands::Recent { hours }) => {
            let records = open_records(cli.file.as_deref(), &config)?;
            let window = match hours {
                Some(h) => hours_window(h),
                None => config.recent_window(),
            };
            if record::has_recent_request(&records, chrono::Utc::now(), window) {
                println!("New prayer requests in the last {} hours", window.num_hours());
            } else {
                println!("No new prayer requests in the last {} hours", window.num_hours());
            }
        }
        Some(Commands::Repl) => {
            let records = open_records(cli.file.as_deref(), &config)?;
            run_repl(&records, config.query_cache_size, color)?;
        }
        None => {
            let records = open_records(cli.file.as_deref(), &config)?;
            run_search(&records, &cli.query.join(" "), StatusArg::All, false, color)?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr) // keep stdout for results
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path),
        None => Ok(AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("using default config: {:#}", e);
            AppConfig::default()
        })),
    }
}

/// Load the log, newest requests first
fn open_records(file: Option<&Path>, config: &AppConfig) -> Result<Vec<PrayerRecord>> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => config
            .effective_records_path()
            .context("No records file given and no default location available")?,
    };

    let mut records = record::load_records(&path)?;
    record::sort_newest_first(&mut records);
    Ok(records)
}

fn run_search(
    records: &[PrayerRecord],
    query: &str,
    status: StatusArg,
    json: bool,
    color: ColorChoice,
) -> Result<()> {
    let compiled = CompiledQuery::new(query);
    let matches: Vec<&PrayerRecord> = compiled
        .filter(records)
        .into_iter()
        .filter(|r| status.allows(r.status))
        .collect();

    tracing::info!(matched = matches.len(), total = records.len(), "search finished");

    if json {
        output::print_json(&matches)?;
    } else {
        output::print_prayer_lists(&matches, !query.trim().is_empty(), color)?;
    }
    Ok(())
}

fn run_repl(records: &[PrayerRecord], cache_size: usize, color: ColorChoice) -> Result<()> {
    let mut cache = QueryCache::new(cache_size);
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read query from stdin")?;
        let searching = !line.trim().is_empty();

        let matches: Vec<&PrayerRecord> = if searching {
            let expr = cache.compiled(&line);
            records.iter().filter(|r| evaluate(r, expr)).collect()
        } else {
            records.iter().collect()
        };

        println!("> {} ({} of {})", line.trim(), matches.len(), records.len());
        output::print_prayer_lists(&matches, searching, color)?;
        println!();
    }

    tracing::debug!(
        hits = cache.hits(),
        misses = cache.misses(),
        "query cache stats"
    );
    Ok(())
}
