//! Cadence demo - a cron thread flipping a switch on the in-memory ledger

use anchor_lang::prelude::Pubkey;
use anyhow::{Context, Result};
use cadence_client::{fetch_exec_context, fetch_switch, ClientConfig, Ledger, Processor, Scheduler};
use cadence_thread_program::state::Trigger;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "cadence-demo")]
#[command(about = "Run a switch thread against the in-memory ledger", version)]
struct Cli {
    /// Path to a TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Thread id of the switch pairing
    #[arg(long, default_value = "switch-demo")]
    thread_id: String,

    /// Cron schedule of the thread
    #[arg(long, default_value = "*/1 * * * * * *")]
    schedule: String,

    /// How long to run, in seconds
    #[arg(long, default_value_t = 5)]
    seconds: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    cadence_client::logging::init(&config.logging);

    let ledger = Arc::new(Ledger::new(config.ledger.clone()));
    let payer = Pubkey::new_unique();
    ledger.airdrop(&payer, 1_000_000_000);

    let processor = Arc::new(Processor::new(ledger.clone()));
    let trigger = Trigger::Cron {
        schedule: cli.schedule.clone(),
        skippable: true,
    };
    let addresses = processor
        .initialize(&payer, cli.thread_id.as_bytes(), Some(trigger), 0)
        .context("Failed to initialize switch")?;
    log::info!("Switch: {}", addresses.switch);
    log::info!("Thread: {}", addresses.thread);

    let scheduler = Arc::new(Scheduler::new(
        processor.clone(),
        payer,
        config.scheduler.clone(),
    ));
    scheduler.watch(addresses.thread)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Drive the ledger clock in real time.
    let clock_ledger = ledger.clone();
    let slot_duration = Duration::from_millis(config.ledger.slot_duration_ms);
    let mut clock_shutdown = shutdown_rx.clone();
    let clock = tokio::spawn(async move {
        let mut interval = tokio::time::interval(slot_duration);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    clock_ledger.advance_slots(1);
                }
                _ = clock_shutdown.changed() => break,
            }
        }
    });

    let runner = tokio::spawn(scheduler.clone().run(shutdown_rx));
    tokio::time::sleep(Duration::from_secs(cli.seconds)).await;
    shutdown_tx.send(true)?;
    runner.await??;
    clock.await?;

    let switch = fetch_switch(&ledger, &addresses.switch)?;
    let exec_context = fetch_exec_context(&ledger, &addresses.thread)?;
    log::info!("Switch state: {}", switch.switch_state);
    match exec_context {
        Some(context) => log::info!("Last executed at slot {}", context.last_exec_at),
        None => log::info!("Thread never executed"),
    }
    Ok(())
}
