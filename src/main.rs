//! Lokalize - HTML to localization keys
//!
//! Command-line entry point: reads an HTML fragment, asks the model's backend
//! to extract and translate its text, and prints or writes the resulting keys.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncReadExt;
use tracing::{Level, info, warn};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lokalize::cli::{Args, Commands};
use lokalize::config::Config;
use lokalize::error::LokalizeError;
use lokalize::models::{AVAILABLE_MODELS, Backend, ModelDescriptor, find_model, models_for_backend};
use lokalize::output::{format_bundle, format_translations, write_bundle, write_translations};
use lokalize::service::TranslationService;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("lokalize.toml").exists() {
                info!("Found lokalize.toml in current directory, loading...");
                Config::from_file("lokalize.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Extract { prefix, input, model, api_key, output } => {
            let prefix = require_prefix(&prefix)?;
            let model_id = model.unwrap_or_else(|| config.default_model.clone());
            let api_key = resolve_api_key(&config, &model_id, api_key);
            let html = read_html(input.as_ref()).await?;

            let service = TranslationService::new(config)?;
            let spinner = spinner(&model_id);
            let result = service.extract_translations(&html, &prefix, &api_key, &model_id).await;
            spinner.finish_and_clear();
            let translations = result.map_err(report)?;

            match output {
                Some(path) => write_translations(&path, &translations)?,
                None => println!("{}", format_translations(&translations)?),
            }
        }
        Commands::Multi { prefix, input, model, api_key, output_dir } => {
            let prefix = require_prefix(&prefix)?;
            let model_id = model.unwrap_or_else(|| config.default_model.clone());
            let api_key = resolve_api_key(&config, &model_id, api_key);
            let html = read_html(input.as_ref()).await?;
            let stem = config.output.file_stem.clone();

            let service = TranslationService::new(config)?;
            let spinner = spinner(&model_id);
            let result = service
                .extract_multi_language_translations(&html, &prefix, &api_key, &model_id)
                .await;
            spinner.finish_and_clear();
            let bundle = result.map_err(report)?;

            match output_dir {
                Some(dir) => {
                    for path in write_bundle(&dir, &stem, &bundle)? {
                        println!("{}", path.display());
                    }
                }
                None => print!("{}", format_bundle(&bundle)?),
            }
        }
        Commands::Models { backend } => {
            let backend = backend.map(|b| b.parse::<Backend>()).transpose()?;

            println!("{:<22} {:<20} {:<10} {:<10} {}", "Id", "Name", "Tokens", "Provider", "Description");
            println!("{}", "-".repeat(100));
            let models: Vec<&ModelDescriptor> = match backend {
                Some(backend) => models_for_backend(backend).collect(),
                None => AVAILABLE_MODELS.iter().collect(),
            };
            for model in models {
                let marker = if model.id == config.default_model { "*" } else { " " };
                println!(
                    "{:<22} {:<20} {:<10} {:<10} {}",
                    format!("{}{}", model.id, marker),
                    model.name,
                    model.max_tokens,
                    model.backend.as_str(),
                    model.description
                );
            }
        }
        Commands::InitConfig { output } => {
            config.save_to_file(&output)?;
            println!("Wrote configuration to {}", output.display());
        }
    }

    Ok(())
}

/// Setup logging to stderr and a daily rolling file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".lokalize").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "lokalize.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // stdout carries the JSON output, so the console layer writes to stderr
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - level: {}, file: {}",
          log_level, log_dir.join("lokalize.log").display());

    Ok(())
}

fn require_prefix(prefix: &str) -> Result<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        bail!("Translation key prefix is required");
    }
    Ok(prefix.to_string())
}

/// Explicit key first, then the env var configured for the model's backend.
/// Unknown models get an empty key; the service reports the model error.
fn resolve_api_key(config: &Config, model_id: &str, explicit: Option<String>) -> String {
    explicit
        .or_else(|| {
            let backend = find_model(model_id)?.backend;
            let var = config.api_key_env(backend);
            let key = std::env::var(var).ok();
            if key.is_none() {
                warn!("No API key given and {} is not set", var);
            }
            key
        })
        .unwrap_or_default()
}

async fn read_html(input: Option<&PathBuf>) -> Result<String> {
    let html = match input {
        Some(path) => {
            info!("Reading HTML from: {}", path.display());
            tokio::fs::read_to_string(path).await.map_err(LokalizeError::from)?
        }
        None => {
            info!("Reading HTML from stdin");
            let mut html = String::new();
            tokio::io::stdin().read_to_string(&mut html).await.map_err(LokalizeError::from)?;
            html
        }
    };

    if html.trim().is_empty() {
        bail!("Input HTML is empty");
    }
    Ok(html)
}

fn spinner(model_id: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Waiting for {}...", model_id));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print the billing hint for quota errors before handing the error to anyhow
fn report(err: LokalizeError) -> anyhow::Error {
    if let Some(url) = err.billing_url() {
        eprintln!("Check your billing settings at: {}", url);
    }
    err.into()
}
