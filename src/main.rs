//! Listing seeder: turns paginated marketplace listing dumps into a sampled
//! seed dataset.
//!
//! Stages, in order:
//!   1. read listing pages, keep popular listings (cached after first run)
//!   2. drop listings matching the ban list
//!   3. project the export fields (images, category path/id, handmade)
//!   4. draw a fixed-size random sample
//!   5. resolve the categories the sample references
//!   6. export items and categories as JSON arrays

mod cache;
mod config;
mod error;
mod export;
mod pipeline;
mod records;
mod source;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{Settings, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "listing_seeder", about = "Build a sampled seed dataset from listing pages")]
struct Cli {
    /// Settings file (TOML). Missing file means compiled-in defaults.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the whole pipeline and export items + categories
    Run {
        /// Fixed RNG seed for a reproducible sample
        #[arg(long)]
        seed: Option<u64>,
        /// Category path depth to keep (K)
        #[arg(long)]
        depth: Option<usize>,
        /// Number of items to sample
        #[arg(short = 'n', long)]
        sample_size: Option<usize>,
    },
    /// Only build the intermediate cache of popular listings
    Cache {
        /// Discard an existing cache first
        #[arg(long)]
        rebuild: bool,
    },
    /// Delete the intermediate cache
    ClearCache,
    /// Print the effective settings
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)?;
    info!(config = ?cli.config, "Settings loaded");

    match cli.command {
        Commands::Run {
            seed,
            depth,
            sample_size,
        } => {
            if seed.is_some() {
                settings.seed = seed;
            }
            if let Some(k) = depth {
                settings.category_path_depth = k;
            }
            if let Some(n) = sample_size {
                settings.sample_size = n;
            }
            println!("Listing seeder");
            println!("==============\n");
            let summary = pipeline::run(&settings)?;
            summary.print(&settings);
        }
        Commands::Cache { rebuild } => {
            if rebuild {
                cache::clear(&settings.cache_path)?;
            }
            let (popular, outcome) = pipeline::popular_listings(&settings)?;
            println!(
                "{} popular listings ({:?}) in {:?}",
                popular.len(),
                outcome,
                settings.cache_path
            );
        }
        Commands::ClearCache => {
            if cache::clear(&settings.cache_path)? {
                println!("Removed {:?}", settings.cache_path);
            } else {
                println!("No cache at {:?}", settings.cache_path);
            }
        }
        Commands::Config => {
            println!("{:#?}", settings);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
