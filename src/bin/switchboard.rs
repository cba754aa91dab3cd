//! # Switchboard CLI
//!
//! - `switchboard models` - list the models that can be routed with the current keys
//! - `switchboard chat --model <id> <prompt>` - send one chat turn
//!
//! Configuration comes from `--config <file>` (TOML, YAML or JSON) merged with
//! the environment, or from the environment alone.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use switchboard::utils::logging::{init_logging, LoggingConfig};
use switchboard::{ChatRequest, Gateway, GatewayConfig};

/// Multi-provider chat gateway
#[derive(Parser)]
#[command(name = "switchboard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file, merged with environment variables
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List models whose vendor has an API key configured
    Models {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send one user prompt and print the assistant reply
    Chat {
        /// Model id; defaults to the configured default model
        #[arg(short, long)]
        model: Option<String>,

        /// System message sent before the prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Sampling temperature (0.0 to 2.0)
        #[arg(short, long)]
        temperature: Option<f64>,

        /// User prompt
        prompt: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<GatewayConfig> {
    load_config_with(path, |key| std::env::var(key).ok())
}

fn load_config_with<F>(path: Option<&PathBuf>, lookup: F) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => GatewayConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?
            .merge_with_lookup(lookup)?,
        None => GatewayConfig::from_lookup(lookup)?,
    };
    Ok(config)
}

fn chat_request(
    model: Option<String>,
    system: Option<String>,
    temperature: Option<f64>,
    prompt: String,
) -> ChatRequest {
    ChatRequest {
        model,
        temperature,
        ..ChatRequest::prompt(prompt, system)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if let Some(level) = cli.log_level {
        logging.level = level;
    }
    init_logging(&logging).context("Failed to initialize logging")?;

    let config = load_config(cli.config.as_ref())?;
    let gateway = Gateway::from_config(&config).context("Failed to start gateway")?;
    debug!("Gateway configured: {:?}", gateway);

    match cli.command {
        Commands::Models { json } => {
            let models = gateway.list_models();
            if json {
                println!("{}", serde_json::to_string_pretty(&models)?);
            } else if models.is_empty() {
                eprintln!("No models available: set an API key such as OPENAI_API_KEY");
            } else {
                for model in models {
                    println!("{:<32} {:<24} {}", model.id, model.name, model.provider);
                }
            }
        }
        Commands::Chat {
            model,
            system,
            temperature,
            prompt,
        } => {
            let request = chat_request(model, system, temperature, prompt);
            match gateway.send(request).await {
                Ok(reply) => println!("{}", reply.content),
                Err(error) => {
                    eprintln!("{}", serde_json::to_string(&error.to_body())?);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
