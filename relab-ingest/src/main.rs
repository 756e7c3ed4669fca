//! RELAB ingest (relab-ingest) - Main entry point
//!
//! Converts the RELAB catalog release under the catalog root into one CSV
//! file per spectrum.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use relab_common::config::{load_toml_config, resolve_config_path, resolve_folder};
use relab_ingest::config::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, ROOT_ENV_VAR};
use relab_ingest::IngestConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for relab-ingest
#[derive(Parser, Debug)]
#[command(name = "relab-ingest")]
#[command(about = "Convert the RELAB spectral catalog into per-spectrum CSV files")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Catalog root containing catalogues/ and data/
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Output directory for CSV files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Diagnostics log path
    #[arg(long)]
    error_log: Option<PathBuf>,

    /// Curated lookup tables file (overrides `lookup_tables` in the config)
    #[arg(long)]
    lookup_tables: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR, CONFIG_FILE_NAME);
    // Loaded before the subscriber exists; load messages are not shown
    let mut config: IngestConfig = load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("relab_ingest={level},relab_common={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let root = resolve_folder(
        args.root.as_deref(),
        ROOT_ENV_VAR,
        config.catalog_root.as_deref(),
        Path::new("."),
    );
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(path) = args.error_log {
        config.error_log = path;
    }
    if let Some(path) = args.lookup_tables {
        config.lookup_tables = Some(path);
    }

    info!("Catalog root: {}", root.display());
    let settings = config.resolve(&root);

    let summary = relab_ingest::run(&settings).context("Ingest failed")?;

    info!("Samples: {}", summary.samples.display_string());
    println!("Wrote {} files.", summary.batch.written);
    println!("Errors logged to {}", summary.error_log.display());
    Ok(())
}
