use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::fs;
use std::path::Path;

use hivemind_rewards::core::config::RewardConfig;
use hivemind_rewards::rewards::aggregate::RewardStack;
use hivemind_rewards::rewards::batch::BatchFile;

#[derive(Parser)]
#[clap(author, version, about = "Offline reward scoring for tagged math completions")]
struct Cli {
    /// Path to a JSON batch file with prompts, completions, and answers
    batch: String,

    /// Path to config file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Debug mode
    #[clap(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(log_level).init();

    // A missing config file falls back to the standard weights
    let config = if Path::new(&cli.config).exists() {
        RewardConfig::from_file(&cli.config)?
    } else {
        RewardConfig::default()
    };

    let raw = fs::read_to_string(&cli.batch)
        .with_context(|| format!("Failed to read batch file: {}", cli.batch))?;
    let batch_file: BatchFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse batch file: {}", cli.batch))?;

    let stack = RewardStack::from_config(&config)?;
    let totals = stack.aggregate(&batch_file.as_batch())?;

    info!("Scored {} completions", totals.len());
    for (idx, total) in totals.iter().enumerate() {
        println!("completion {:>2}: {:.3}", idx, total);
    }

    Ok(())
}
