// SYNOID Chroma Entry Point
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use synoid_chroma::config::ServiceConfig;
use synoid_chroma::emotion::NormalizationStrategy;
use synoid_chroma::server;
use synoid_chroma::state::ServiceState;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "synoid-chroma")]
#[command(about = "Text emotion (VAD) to HSL color service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port to listen on (overrides CHROMA_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Normalization strategy: linear or cdf (overrides CHROMA_NORMALIZATION)
        #[arg(long)]
        normalization: Option<NormalizationStrategy>,

        /// Path to the CDF table artifact (overrides CHROMA_CDF_TABLE)
        #[arg(long)]
        cdf_table: Option<PathBuf>,
    },

    /// Analyze a single text and print the HSL color as JSON
    Analyze {
        /// Text to analyze
        #[arg(short, long)]
        text: String,

        /// Normalization strategy: linear or cdf
        #[arg(long)]
        normalization: Option<NormalizationStrategy>,

        /// Path to the CDF table artifact
        #[arg(long)]
        cdf_table: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("--- SYNOID CHROMA v{} ---", env!("CARGO_PKG_VERSION"));

    let args = Cli::parse();
    let mut config = ServiceConfig::from_env()?;

    match args.command {
        Commands::Serve {
            port,
            normalization,
            cdf_table,
        } => {
            apply_overrides(&mut config, normalization, cdf_table);
            if let Some(p) = port {
                config.port = p;
            }

            let state = Arc::new(ServiceState::from_config(&config)?);
            server::start_server(config.port, state).await?;
        }
        Commands::Analyze {
            text,
            normalization,
            cdf_table,
        } => {
            apply_overrides(&mut config, normalization, cdf_table);
            let state = ServiceState::from_config(&config)?;

            match state.pipeline.analyze(&text).await {
                Ok(color) => println!("{}", serde_json::to_string(&color)?),
                Err(e) => {
                    error!("Analysis failed [{}]: {}", e.category(), e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn apply_overrides(
    config: &mut ServiceConfig,
    normalization: Option<NormalizationStrategy>,
    cdf_table: Option<PathBuf>,
) {
    if let Some(n) = normalization {
        config.normalization = n;
    }
    if cdf_table.is_some() {
        config.cdf_table = cdf_table;
    }
}
