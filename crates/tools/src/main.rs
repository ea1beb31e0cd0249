use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nightshift_core::journal_file::load_journal_from_file;
use nightshift_core::{SessionConfig, replay_night};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSONL journal to replay
    #[arg(short, long)]
    journal: PathBuf,

    /// Optional session config JSON; defaults to the shipped balance
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_journal_from_file(&args.journal)
        .map_err(|e| anyhow::anyhow!("failed to load journal {}: {e}", args.journal.display()))?;

    let config = match &args.config {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            let config: SessionConfig =
                serde_json::from_str(&data).with_context(|| "failed to deserialize config JSON")?;
            config.validate().map_err(|e| anyhow::anyhow!("invalid config: {e}"))?;
            config
        }
        None => SessionConfig::default(),
    };

    if loaded.journal.config_hash != config.content_hash() {
        eprintln!("warning: journal was recorded under a different config; replay may diverge");
    }

    let result = replay_night(&config, &loaded.journal)
        .map_err(|e| anyhow::anyhow!("replay failed during execution: {e:?}"))?;

    println!("Replay complete.");
    println!("Final phase: {:?}", result.final_phase);
    if let Some(attacker) = result.attacker {
        println!("Caught by: {attacker:?}");
    }
    println!("Elapsed: {} ms", result.final_ms);
    println!("Snapshot hash: {}", result.final_snapshot_hash);

    Ok(())
}
