//! Polling scheduler
//!
//! Watches a set of threads and executes each one whose trigger is active. Conflicts and triggers
//! that are not ready yet are expected outcomes and only logged.

use crate::config::SchedulerConfig;
use crate::error::ClientError;
use crate::processor::Processor;
use crate::reader::fetch_thread;
use anchor_lang::prelude::Pubkey;
use cadence_thread_program::state::{Trigger, WatchedAccount};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// What one pass over the watched threads did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub executed: Vec<Pubkey>,
    pub idle: Vec<Pubkey>,
    pub conflicts: Vec<Pubkey>,
    pub failed: Vec<Pubkey>,
}

pub struct Scheduler {
    processor: Arc<Processor>,
    signatory: Pubkey,
    config: SchedulerConfig,
    threads: RwLock<Vec<Pubkey>>,
}

impl Scheduler {
    pub fn new(processor: Arc<Processor>, signatory: Pubkey, config: SchedulerConfig) -> Self {
        Self {
            processor,
            signatory,
            config,
            threads: RwLock::new(Vec::new()),
        }
    }

    /// Adds a thread to the watch list.
    pub fn watch(&self, thread: Pubkey) -> anyhow::Result<()> {
        let mut threads = self.threads.write();
        if threads.contains(&thread) {
            return Ok(());
        }
        if threads.len() >= self.config.max_threads {
            anyhow::bail!(
                "Cannot watch {}: limit of {} threads reached",
                thread,
                self.config.max_threads
            );
        }
        threads.push(thread);
        debug!("Watching thread {}", thread);
        Ok(())
    }

    pub fn unwatch(&self, thread: &Pubkey) -> bool {
        let mut threads = self.threads.write();
        let before = threads.len();
        threads.retain(|watched| watched.ne(thread));
        before != threads.len()
    }

    pub fn watched(&self) -> Vec<Pubkey> {
        self.threads.read().clone()
    }

    /// Executes every watched thread that is eligible at the current slot.
    pub fn tick(&self) -> TickReport {
        let mut report = TickReport::default();
        let ledger = self.processor.ledger();

        for thread_key in self.watched() {
            let thread = match fetch_thread(ledger, &thread_key) {
                Ok(thread) => thread,
                Err(err) => {
                    warn!("Skipping thread {}: {}", thread_key, err);
                    report.failed.push(thread_key);
                    continue;
                }
            };

            let watched_account = match thread.trigger {
                Trigger::Account { address, .. } => {
                    ledger.get_account(&address).map(|account| (address, account))
                }
                _ => None,
            };
            let watched = watched_account
                .as_ref()
                .map(|(address, account)| WatchedAccount {
                    address: *address,
                    data: &account.data,
                });
            if !thread.is_eligible(&ledger.clock(), watched.as_ref()) {
                report.idle.push(thread_key);
                continue;
            }

            match self
                .processor
                .execute(&thread_key, &self.signatory, Some(thread.exec_count))
            {
                Ok(_) => report.executed.push(thread_key),
                Err(ClientError::TriggerConflict(_)) => {
                    debug!("Thread {} was executed by another caller", thread_key);
                    report.conflicts.push(thread_key);
                }
                Err(ClientError::TriggerNotReady(_)) => report.idle.push(thread_key),
                Err(err) => {
                    warn!("Thread {} failed: {}", thread_key, err);
                    report.failed.push(thread_key);
                }
            }
        }

        report
    }

    /// Ticks every poll interval until `shutdown` flips to true or its sender is dropped.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        info!(
            "Scheduler started: {} thread(s), polling every {}ms",
            self.threads.read().len(),
            self.config.poll_interval_ms
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let scheduler = self.clone();
                    let report = tokio::task::spawn_blocking(move || scheduler.tick()).await?;
                    if !report.executed.is_empty() {
                        debug!("Executed {} thread(s)", report.executed.len());
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler stopped");
                        return Ok(());
                    }
                }
            }
        }
    }
}
