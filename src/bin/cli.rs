//! examwatch CLI
//!
//! Polls the booking service and reports slots as they appear and disappear.

use std::ops::Range;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use examwatch::{
    error::{AppError, Result},
    models::{Config, ExaminationType, LocationId, LocationSets, ProxyConfig},
    pipeline::{self, ListOptions, SortOrder},
};

/// examwatch - Driving exam slot watcher
#[derive(Parser, Debug)]
#[command(name = "examwatch", version, about = "Watches for available driving exam slots")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "examwatch.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Settings shared by the commands that talk to the booking API.
#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Examination type to watch
    #[arg(short, long, value_enum)]
    exam: ExaminationType,

    /// Request proxy (overrides the config file)
    #[arg(long, value_enum)]
    proxy: Option<ProxyChoice>,

    /// Location set JSON file (overrides the config file's [locations])
    #[arg(long)]
    locations: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ProxyChoice {
    None,
    Fiddler,
    Tor,
}

impl From<ProxyChoice> for ProxyConfig {
    fn from(choice: ProxyChoice) -> Self {
        match choice {
            ProxyChoice::None => ProxyConfig::None,
            ProxyChoice::Fiddler => ProxyConfig::Fiddler,
            ProxyChoice::Tor => ProxyConfig::Tor,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll continuously and report added/removed slots
    Watch {
        #[command(flatten)]
        run: RunArgs,

        /// Seconds between polling cycles
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Fetch once and print all slots by date
    List {
        #[command(flatten)]
        run: RunArgs,

        /// Latest first
        #[arg(long)]
        descending: bool,

        /// Print distinct dates only
        #[arg(long)]
        dates_only: bool,
    },

    /// Probe a range of location IDs and record the valid ones
    Scan {
        #[command(flatten)]
        run: RunArgs,

        /// First ID to probe
        #[arg(long, default_value_t = 1_000_000)]
        from: LocationId,

        /// End of the range (exclusive)
        #[arg(long, default_value_t = 1_000_200)]
        to: LocationId,

        /// Where to merge the discovered IDs
        #[arg(short, long, default_value = "locations.json")]
        output: PathBuf,
    },

    /// Validate the configuration file
    Validate,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load the config file and apply per-run overrides from the command line.
fn load_config(path: &Path, run: &RunArgs) -> Result<Config> {
    let mut config = Config::load_or_default(path)?;
    if let Some(proxy) = run.proxy {
        config.proxy = proxy.into();
    }
    config.validate()?;
    Ok(config)
}

/// Location IDs for the chosen examination type.
async fn resolve_locations(config: &Config, run: &RunArgs) -> Result<Vec<LocationId>> {
    let sets = match &run.locations {
        Some(path) => LocationSets::load(path).await?,
        None => config.locations.clone(),
    };
    Ok(sets.ids(run.exam).to_vec())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Watch {
            run,
            interval,
            cycles,
        } => {
            let mut config = load_config(&cli.config, &run)?;
            if let Some(secs) = interval {
                if secs == 0 {
                    return Err(AppError::validation("--interval must be > 0"));
                }
                config.polling.interval_secs = secs;
            }
            let locations = resolve_locations(&config, &run).await?;
            pipeline::run_watch(&config, run.exam, locations, cycles).await?;
        }

        Command::List {
            run,
            descending,
            dates_only,
        } => {
            let config = load_config(&cli.config, &run)?;
            let locations = resolve_locations(&config, &run).await?;
            let options = ListOptions {
                order: if descending {
                    SortOrder::Descending
                } else {
                    SortOrder::Ascending
                },
                dates_only,
            };
            pipeline::run_list(&config, run.exam, locations, options).await?;
        }

        Command::Scan {
            run,
            from,
            to,
            output,
        } => {
            let config = load_config(&cli.config, &run)?;
            let range: Range<LocationId> = from..to;
            pipeline::run_scan(&config, run.exam, range, &output).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let config = Config::load(&cli.config)?;

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} kunskapsprov, {} körprov locations)",
                config.locations.kunskapsprov.len(),
                config.locations.korprov.len()
            );
        }

        Command::Init { force } => {
            if cli.config.exists() && !force {
                log::warn!(
                    "Config already exists at {}. Use --force to overwrite.",
                    cli.config.display()
                );
                return Ok(());
            }
            Config::default().save(&cli.config)?;
            log::info!("Default configuration written to {}", cli.config.display());
        }
    }

    Ok(())
}
