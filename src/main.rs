use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cheat_sheet::catalog::{Catalog, CatalogLoader};
use cheat_sheet::config::AppConfig;
use cheat_sheet::pipeline::{self, Pipeline};
use cheat_sheet::render;

#[derive(Parser)]
#[command(name = "cheat-sheet")]
#[command(about = "Turn a 40k army list export into a printable per-phase cheat sheet")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./cheat-sheet.toml")]
    config: PathBuf,

    /// Catalog directory (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Similarity cutoff for approximate unit matches (overrides config)
    #[arg(long)]
    cutoff: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the cheat sheet for an export
    Generate {
        /// Army list export (plain text)
        #[arg(long)]
        export: PathBuf,

        /// Output file (defaults to the configured output path)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Emit the sheet as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Parse an export and print what was recognised
    Parse {
        #[arg(long)]
        export: PathBuf,
    },

    /// Show how each unit of an export resolves against the catalog
    Check {
        #[arg(long)]
        export: PathBuf,
    },

    /// Summarise the loaded catalog
    Catalog,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (plain, json) = if json {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(cutoff) = cli.cutoff {
        config.matching.cutoff = cutoff;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_catalog(config: &AppConfig) -> Result<Catalog> {
    CatalogLoader::default()
        .load_dir(&config.data_dir)
        .with_context(|| format!("Failed to load catalog from {:?}", config.data_dir))
}

fn read_export(path: &Path) -> Result<String> {
    pipeline::read_export(path).with_context(|| format!("Failed to read export {:?}", path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting cheat-sheet v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Generate { export, out, json } => {
            let sheet = pipeline::generate(&config, &export)
                .with_context(|| format!("Failed to build cheat sheet for {:?}", export))?;

            let contents = if json {
                serde_json::to_string_pretty(&sheet)?
            } else {
                render::render_html(&sheet)
            };

            match (out, json) {
                (None, true) => println!("{}", contents),
                (out, _) => {
                    let path = out.unwrap_or_else(|| config.output.path.clone());
                    pipeline::write_output(&path, &contents)?;
                    eprintln!("Wrote {}", path.display());
                }
            }

            // stdout may carry the JSON sheet
            eprintln!("{}", sheet.summary());
        }

        Commands::Parse { export } => {
            let text = read_export(&export)?;
            let parsed = Pipeline::from_config(&config).parse(&text);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }

        Commands::Check { export } => {
            let catalog = load_catalog(&config)?;
            let text = read_export(&export)?;
            let pipeline = Pipeline::from_config(&config);
            let sheet = pipeline.build(&text, &catalog);

            println!("{}", sheet.meta.display_title());
            println!("Cutoff: {:.2}", pipeline.resolver().cutoff());
            if let Some(detachment) = &sheet.meta.detachment {
                println!("Detachment: {}", detachment);
            }
            for unit in &sheet.units {
                println!(
                    "  [{:.1}] {:<12} {} x{} -> {}",
                    unit.score(),
                    unit.confidence.to_string(),
                    unit.display_name(),
                    unit.requested.count,
                    unit.matched_key.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Catalog => {
            let catalog = load_catalog(&config)?;

            println!("Units: {}", catalog.len());
            println!("Stratagems: {}", catalog.stratagems.len());
            println!("Phases: {}", catalog.phases.order.join(", "));
            let detachments = catalog.detachments();
            if !detachments.is_empty() {
                println!("Detachments: {}", detachments.join(", "));
            }
            for unit in catalog.units.values() {
                println!(
                    "  {} ({})",
                    unit.name,
                    unit.role.as_deref().unwrap_or("no role")
                );
            }
        }
    }

    Ok(())
}
