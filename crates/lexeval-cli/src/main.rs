use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lexeval_core::{analyze, AnalysisType, FallbackContent, SeededRandom};
use lexeval_runtime::{Evaluator, RuntimeConfig};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lexeval")]
#[command(author, version, about = "Evaluate short generated texts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Default log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print lexical metrics for a text
    Analyze {
        /// Text to analyze (reads stdin when omitted)
        text: Option<String>,
    },

    /// Evaluate a text, falling back to lexical scoring if the provider fails
    Evaluate {
        /// Text to evaluate (reads stdin when omitted)
        text: Option<String>,

        /// Analysis type: analyze, advice, patterns, schedule, evaluate
        #[arg(short = 't', long = "type", default_value = "evaluate")]
        analysis_type: AnalysisType,

        /// Extra context as a JSON document
        #[arg(short, long)]
        context: Option<String>,

        /// Runtime config file (.yaml, .yml or .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip the provider entirely
        #[arg(long)]
        offline: bool,
    },

    /// Print static fallback content
    Fallback {
        #[arg(value_enum)]
        pool: Pool,

        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Pool {
    Advice,
    Quote,
    Patterns,
    Schedule,
}

fn setup_logging(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Commands::Analyze { text } => {
            let text = read_text(text)?;
            print_json(&analyze(&text))
        }
        Commands::Evaluate {
            text,
            analysis_type,
            context,
            config,
            offline,
        } => {
            let text = read_text(text)?;
            let context = context
                .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
                .transpose()
                .context("--context is not valid JSON")?;

            let evaluator = if offline {
                Evaluator::offline()
            } else {
                let config = match config {
                    Some(path) => RuntimeConfig::from_file(&path)
                        .with_context(|| format!("Failed to load config {}", path.display()))?,
                    None => RuntimeConfig::default(),
                }
                .with_env_overrides()?;

                Evaluator::from_config(&config).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Provider unavailable, evaluating offline");
                    Evaluator::offline()
                })
            };

            let result = evaluator.evaluate(&text, analysis_type, context).await;
            print_json(&result)
        }
        Commands::Fallback { pool, seed } => match seed {
            Some(seed) => {
                print_fallback(FallbackContent::with_random(SeededRandom::new(seed)), pool)
            }
            None => print_fallback(FallbackContent::new(), pool),
        },
    }
}

fn print_fallback<R: lexeval_core::RandomSource>(
    mut content: FallbackContent<R>,
    pool: Pool,
) -> Result<()> {
    match pool {
        Pool::Advice => print_json(&content.advice_payload()),
        Pool::Quote => print_json(&content.motivational_payload()),
        Pool::Patterns => print_json(&content.patterns_payload()),
        Pool::Schedule => print_json(&content.schedule_payload()),
    }
}
