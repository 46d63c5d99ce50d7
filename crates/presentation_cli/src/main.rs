//! StrideForge CLI
//!
//! Runs the threat-modeling pipeline in-process and prints the resulting
//! model as JSON, without going through the HTTP server.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use application::{
    AnalysisService, error::ApplicationError, ports::CompletionPort,
};
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, OpenRouterCompletionAdapter, extract_zip};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit code for a description that failed the completeness gate
const EXIT_INSUFFICIENT_DETAIL: u8 = 2;

/// StrideForge CLI
#[derive(Parser)]
#[command(name = "strideforge")]
#[command(author, version, about = "STRIDE threat modeling from the command line", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to strideforge.toml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a free-text application description
    ///
    /// The description is checked for completeness first; if it is too thin
    /// the command prints the feedback items and exits with code 2.
    Describe {
        /// Description text (mutually exclusive with --file)
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the description from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Model override forwarded to the completion service
        #[arg(short, long)]
        model: Option<String>,

        /// Analyze the six STRIDE categories concurrently
        #[arg(short, long)]
        parallel: bool,
    },

    /// Analyze a codebase directory or zip archive (whitebox)
    Scan {
        /// Path to the codebase root or a .zip archive of it
        path: PathBuf,

        /// Model override forwarded to the completion service
        #[arg(short, long)]
        model: Option<String>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Resolve the description from --text / --file
fn read_description(text: Option<String>, file: Option<&PathBuf>) -> anyhow::Result<String> {
    match (text, file) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        _ => anyhow::bail!("provide the description via --text or --file"),
    }
}

fn load_config(path: Option<&PathBuf>) -> AppConfig {
    let result = match path {
        Some(path) => AppConfig::load_from(&path.to_string_lossy()),
        None => AppConfig::load(),
    };
    result.unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    })
}

fn build_service(config: &AppConfig) -> anyhow::Result<AnalysisService> {
    let adapter = OpenRouterCompletionAdapter::new(config.completion.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize completion backend: {e}"))?;
    let completion: Arc<dyn CompletionPort> = Arc::new(adapter);
    Ok(AnalysisService::new(
        completion,
        config.analysis.max_concurrency,
    ))
}

fn print_model(model: &domain::entities::ThreatModel) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(model)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(cli.config.as_ref());
    let service = build_service(&config)?;

    match cli.command {
        Commands::Describe {
            text,
            file,
            model,
            parallel,
        } => {
            let description = read_description(text, file.as_ref())?;

            match service
                .analyze_description(&description, model.as_deref(), parallel)
                .await
            {
                Ok(threat_model) => {
                    print_model(&threat_model)?;
                },
                Err(ApplicationError::InsufficientDetail { feedback }) => {
                    eprintln!("❌ More details needed for effective threat modeling:");
                    for item in feedback {
                        eprintln!("   - {item}");
                    }
                    return Ok(ExitCode::from(EXIT_INSUFFICIENT_DETAIL));
                },
                Err(e) => return Err(e.into()),
            }
        },

        Commands::Scan { path, model } => {
            if !path.exists() {
                anyhow::bail!("path not found: {}", path.display());
            }

            let threat_model = if path.extension().is_some_and(|ext| ext == "zip") {
                let bytes = std::fs::read(&path)?;
                let extracted = extract_zip(&bytes)?;
                let root = extracted.into_root();
                let result = service.analyze_codebase(&root, model.as_deref()).await;
                if let Err(e) = std::fs::remove_dir_all(&root) {
                    tracing::warn!(path = %root.display(), "Failed to clean up extracted archive: {}", e);
                }
                result?
            } else {
                service.analyze_codebase(&path, model.as_deref()).await?
            };

            print_model(&threat_model)?;
        },
    }

    Ok(ExitCode::SUCCESS)
}
