use anyhow::Result;
use aura_core::{AuraConfig, RegulationMode};
use aura_regulator::RegulationEngine;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod command;
mod render;

use command::ReplCommand;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file (missing file means defaults)
    #[arg(short, long, default_value = "aura.toml")]
    config: PathBuf,

    /// Regulation mode to start in (overrides config)
    #[arg(short, long)]
    mode: Option<RegulationMode>,

    /// Seed for reproducible stress spikes
    #[arg(long)]
    seed: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut config = AuraConfig::load_or_default(&args.config);
    if let Some(mode) = args.mode {
        config.regulation.initial_mode = mode;
    }
    if let Some(seed) = args.seed {
        config.stimulus.seed = Some(seed);
    }

    info!(
        "Starting regulator in {} mode (tick {}ms, settle {}ms)",
        config.regulation.initial_mode,
        config.regulation.tick_interval_ms,
        config.regulation.settle_delay_ms
    );
    let engine = RegulationEngine::with_config(&config)?;

    // Narrate log entries as they land, including ones written by timers.
    let mut updates = engine.subscribe();
    let narrator = tokio::spawn(async move {
        let mut last_seen = 0u64;
        while updates.changed().await.is_ok() {
            let snap = updates.borrow_and_update().clone();
            let skipped = render::skipped_entries(&snap, last_seen);
            if skipped > 0 {
                println!("({} entries skipped)", skipped);
            }
            for entry in render::new_entries(&snap, last_seen) {
                println!("{}", render::entry_line(entry));
            }
            if let Some(newest) = snap.log.first() {
                last_seen = last_seen.max(newest.id);
            }
        }
    });

    println!("Aura regulator online. Type 'help' for commands.");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match command::parse(&line) {
            Ok(None) => {}
            Ok(Some(ReplCommand::Quit)) => break,
            Ok(Some(cmd)) => run_command(&engine, &config, cmd).await?,
            Err(e) => println!("error: {:#}", e),
        }
        prompt()?;
    }

    engine.shutdown().await;
    if let Err(e) = narrator.await {
        warn!("Narrator task failed: {}", e);
    }
    println!();
    Ok(())
}

async fn run_command(
    engine: &RegulationEngine,
    config: &AuraConfig,
    cmd: ReplCommand,
) -> Result<()> {
    match cmd {
        ReplCommand::Inject(n) => {
            for _ in 0..n {
                engine.inject_failure().await;
            }
        }
        ReplCommand::Mode(mode) => engine.set_mode(mode).await,
        ReplCommand::Status => {
            print!("{}", render::status(&engine.snapshot(), &config.regulation));
        }
        ReplCommand::Json => {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
        ReplCommand::Wait(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
        ReplCommand::Classify { valence, arousal } => {
            println!("{}", render::classification(valence, arousal));
        }
        ReplCommand::Help => println!("{}", command::HELP),
        ReplCommand::Quit => {}
    }
    Ok(())
}
