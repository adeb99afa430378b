use anchor_lang::prelude::*;

use crate::{
    errors::ThreadError,
    state::{ClockData, ExecContext},
    utils::{account_data_hash, next_timestamp},
};

/// The condition that makes a thread eligible to execute.
#[derive(AnchorDeserialize, AnchorSerialize, Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Eligible on every explicit call, at most once per slot.
    Manual,

    /// Eligible whenever the next moment of a cron schedule has passed.
    Cron {
        /// The schedule in cron syntax.
        schedule: String,
        /// Whether missed moments may be skipped instead of replayed one by one.
        skippable: bool,
    },

    /// Eligible every `seconds` after the previous run.
    Interval { seconds: i64, skippable: bool },

    /// Eligible once the cluster reaches the slot. Fires once.
    Slot { slot: u64 },

    /// Eligible once the cluster reaches the epoch. Fires once.
    Epoch { epoch: u64 },

    /// Eligible once the cluster clock reaches the unix timestamp. Fires once.
    Timestamp { unix_ts: i64 },

    /// Eligible whenever the watched byte range of an account changes.
    Account {
        /// The address of the account to watch.
        address: Pubkey,
        /// The byte offset of the account data to watch.
        offset: u64,
        /// The size of the byte slice to watch.
        size: u64,
    },
}

/// The event which allowed a particular thread execution.
#[derive(AnchorDeserialize, AnchorSerialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerContext {
    Manual,
    Cron { started_at: i64 },
    Interval { started_at: i64 },
    Slot { started_at: u64 },
    Epoch { started_at: u64 },
    Timestamp { started_at: i64 },
    Account { data_hash: u64 },
}

impl TriggerContext {
    pub const SPACE: usize = 1 + 8;
}

/// Account data handed to an `Account` trigger.
#[derive(Clone, Copy, Debug)]
pub struct WatchedAccount<'a> {
    pub address: Pubkey,
    pub data: &'a [u8],
}

impl Trigger {
    pub fn space(&self) -> usize {
        1 + match self {
            Trigger::Manual => 0,
            Trigger::Cron { schedule, .. } => 4 + schedule.len() + 1,
            Trigger::Interval { .. } => 8 + 1,
            Trigger::Slot { .. } | Trigger::Epoch { .. } | Trigger::Timestamp { .. } => 8,
            Trigger::Account { .. } => 32 + 8 + 8,
        }
    }

    /// Rejects triggers that could never fire after `clock`.
    pub fn validate(&self, clock: &ClockData) -> Result<()> {
        match self {
            Trigger::Cron { schedule, .. } => {
                next_timestamp(clock.unix_timestamp, schedule)?
                    .ok_or(ThreadError::InvalidSchedule)?;
            }
            Trigger::Interval { seconds, .. } => {
                require!(*seconds > 0, ThreadError::InvalidTrigger);
            }
            Trigger::Account { size, .. } => {
                require!(*size > 0, ThreadError::InvalidTrigger);
            }
            Trigger::Manual
            | Trigger::Slot { .. }
            | Trigger::Epoch { .. }
            | Trigger::Timestamp { .. } => {}
        }
        Ok(())
    }

    /// Decides whether the trigger is active at `clock`.
    ///
    /// On success returns the context to record for this execution.
    pub fn evaluate(
        &self,
        created_at: &ClockData,
        exec_context: Option<&ExecContext>,
        clock: &ClockData,
        watched: Option<&WatchedAccount>,
    ) -> Result<TriggerContext> {
        // Time based triggers count from the previous threshold, or from creation.
        let last_started_at = exec_context
            .and_then(|ctx| match ctx.trigger_context {
                TriggerContext::Cron { started_at } | TriggerContext::Interval { started_at } => {
                    Some(started_at)
                }
                _ => None,
            })
            .unwrap_or(created_at.unix_timestamp);

        match self {
            Trigger::Manual => Ok(TriggerContext::Manual),
            Trigger::Cron {
                schedule,
                skippable,
            } => {
                let threshold = next_timestamp(last_started_at, schedule)?
                    .ok_or(ThreadError::TriggerNotReady)?;
                require!(
                    clock.unix_timestamp >= threshold,
                    ThreadError::TriggerNotReady
                );
                // Skippable schedules resume from now instead of replaying every missed moment.
                let started_at = if *skippable {
                    clock.unix_timestamp
                } else {
                    threshold
                };
                Ok(TriggerContext::Cron { started_at })
            }
            Trigger::Interval { seconds, skippable } => {
                require!(*seconds > 0, ThreadError::InvalidTrigger);
                let threshold = last_started_at
                    .checked_add(*seconds)
                    .ok_or(ThreadError::MathOverflow)?;
                require!(
                    clock.unix_timestamp >= threshold,
                    ThreadError::TriggerNotReady
                );
                let started_at = if *skippable {
                    clock.unix_timestamp
                } else {
                    threshold
                };
                Ok(TriggerContext::Interval { started_at })
            }
            Trigger::Slot { slot } => {
                require!(
                    exec_context.is_none() && clock.slot >= *slot,
                    ThreadError::TriggerNotReady
                );
                Ok(TriggerContext::Slot { started_at: *slot })
            }
            Trigger::Epoch { epoch } => {
                require!(
                    exec_context.is_none() && clock.epoch >= *epoch,
                    ThreadError::TriggerNotReady
                );
                Ok(TriggerContext::Epoch { started_at: *epoch })
            }
            Trigger::Timestamp { unix_ts } => {
                require!(
                    exec_context.is_none() && clock.unix_timestamp >= *unix_ts,
                    ThreadError::TriggerNotReady
                );
                Ok(TriggerContext::Timestamp {
                    started_at: *unix_ts,
                })
            }
            Trigger::Account {
                address,
                offset,
                size,
            } => {
                let watched = watched
                    .filter(|watched| watched.address.eq(address))
                    .ok_or(ThreadError::TriggerNotReady)?;
                let data_hash = account_data_hash(watched.data, *offset, *size);

                if let Some(exec_context) = exec_context {
                    match exec_context.trigger_context {
                        TriggerContext::Account {
                            data_hash: prior_data_hash,
                        } => require!(
                            data_hash.ne(&prior_data_hash),
                            ThreadError::TriggerNotReady
                        ),
                        _ => return err!(ThreadError::InvalidThreadState),
                    }
                }
                Ok(TriggerContext::Account { data_hash })
            }
        }
    }
}
