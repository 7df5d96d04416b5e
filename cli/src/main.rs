#![forbid(unsafe_code)]

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use randsn_core::config::{ConfigLocation, SerialConfig, DEFAULT_BIGGEST, DEFAULT_SMALLEST};
use randsn_core::{issue_to_file, issue_to_writer};

#[derive(Parser, Debug)]
#[command(
    name = "randsn",
    about = "Hand out non-sequential, non-repeating serial numbers for printed codes."
)]
struct Args {
    /// Directory holding the config file (defaults to the current directory)
    #[arg(long, value_name = "PATH", global = true)]
    dir: Option<PathBuf>,

    /// Config file name, `.json` is appended when missing
    #[arg(long, value_name = "NAME", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file with a random starting seed
    Init {
        /// Largest serial that may be issued
        #[arg(long, default_value_t = DEFAULT_BIGGEST)]
        biggest: u64,

        /// Smallest serial that may be issued
        #[arg(long, default_value_t = DEFAULT_SMALLEST)]
        smallest: u64,

        /// Text placed before each serial, e.g. a URL for QR codes
        #[arg(long)]
        prefix: Option<String>,

        /// Replace an existing config (the old seed is lost)
        #[arg(long, action = clap::ArgAction::SetTrue)]
        force: bool,
    },

    /// Generate a batch of codes and advance the saved seed
    Generate {
        /// Number of codes to generate
        #[arg(long, short = 'n')]
        count: u64,

        /// New output file, one code per line (defaults to stdout)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Print the config and the generator state it resumes from
    Show,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let location = ConfigLocation::new(args.dir.as_deref(), args.config.as_deref())
        .context("invalid config location")?;

    match args.command {
        Command::Init {
            biggest,
            smallest,
            prefix,
            force,
        } => init(&location, biggest, smallest, prefix, force),
        Command::Generate { count, out } => generate(&location, count, out),
        Command::Show => show(&location),
    }
}

fn init(
    location: &ConfigLocation,
    biggest: u64,
    smallest: u64,
    prefix: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    if location.exists() && !force {
        bail!(
            "{} already exists; pass --force to replace it and lose its seed",
            location.path().display()
        );
    }

    let config = SerialConfig::configure(biggest, smallest, prefix, &mut rand::thread_rng())
        .context("invalid serial range")?;
    config
        .save(location)
        .with_context(|| format!("failed to write {}", location.path().display()))?;

    tracing::info!(
        path = %location.path().display(),
        smallest,
        biggest,
        "created serial config"
    );
    Ok(())
}

fn generate(location: &ConfigLocation, count: u64, out: Option<PathBuf>) -> anyhow::Result<()> {
    let config = SerialConfig::load(location)
        .with_context(|| format!("failed to load {}", location.path().display()))?;

    // The advanced seed is saved before any code is emitted
    let batch = match &out {
        Some(path) => issue_to_file(&config, count, location, path)
            .with_context(|| format!("failed to issue batch to {}", path.display()))?,
        None => issue_to_writer(&config, count, location, BufWriter::new(io::stdout().lock()))
            .context("failed to issue batch to stdout")?,
    };

    tracing::info!(
        count = batch.len(),
        next_seed = batch.next_config().seed(),
        "batch complete"
    );
    Ok(())
}

fn show(location: &ConfigLocation) -> anyhow::Result<()> {
    let config = SerialConfig::load(location)
        .with_context(|| format!("failed to load {}", location.path().display()))?;
    let sampler = config.sampler()?;

    let summary = serde_json::json!({
        "path": location.path().display().to_string(),
        "smallest": config.smallest(),
        "biggest": config.biggest(),
        "seed": config.seed(),
        "prefix": config.prefix(),
        "serials_per_cycle": sampler.period(),
        "state": sampler.state(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
