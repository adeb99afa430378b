//! Native processor
//!
//! Runs the thread and switch program logic against the [`Ledger`]. Every operation happens inside
//! one ledger transaction, so it either lands in full or leaves every account untouched.

use crate::error::{ClientError, Result};
use crate::ledger::{Ledger, Transaction};
use crate::pda::{thread_address, SwitchAddresses};
use crate::targets::TargetRegistry;
use anchor_lang::prelude::Pubkey;
use cadence_switch_program::state::{toggle_instruction, Switch};
use cadence_thread_program::state::{
    ExecContext, SerializableInstruction, Thread, Trigger, WatchedAccount,
};
use log::{debug, info};
use std::sync::Arc;

/// Result of a committed execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub thread: Pubkey,
    pub exec_count: u64,
    pub exec_context: ExecContext,
}

/// An execution that ran against a snapshot and waits to be committed.
///
/// Dropping it discards the execution.
#[derive(Debug)]
pub struct PreparedExec<'a> {
    tx: Transaction<'a>,
    outcome: ExecOutcome,
}

impl PreparedExec<'_> {
    pub fn outcome(&self) -> &ExecOutcome {
        &self.outcome
    }

    /// Commits the execution. Losing the race against another commit is a trigger conflict.
    pub fn commit(self) -> Result<ExecOutcome> {
        let outcome = self.outcome;
        self.tx.commit().map_err(|err| match err {
            ClientError::WriteConflict(_) => ClientError::TriggerConflict(outcome.thread),
            other => other,
        })?;
        info!(
            "Thread {} executed at slot {} (exec #{})",
            outcome.thread, outcome.exec_context.last_exec_at, outcome.exec_count
        );
        Ok(outcome)
    }
}

pub struct Processor {
    ledger: Arc<Ledger>,
    targets: TargetRegistry,
}

impl Processor {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self::with_targets(ledger, TargetRegistry::default())
    }

    pub fn with_targets(ledger: Arc<Ledger>, targets: TargetRegistry) -> Self {
        Self { ledger, targets }
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Creates a switch and the thread that toggles it.
    pub fn initialize(
        &self,
        payer: &Pubkey,
        thread_id: &[u8],
        trigger: Option<Trigger>,
        amount: u64,
    ) -> Result<SwitchAddresses> {
        let addresses = SwitchAddresses::derive(thread_id)?;
        let mut tx = self.ledger.begin();

        if let Some(existing) = tx.account(&addresses.switch) {
            if !existing.data.is_empty() {
                return Err(ClientError::AlreadyInitialized(addresses.switch));
            }
        }

        let target = toggle_instruction(
            addresses.switch,
            addresses.thread,
            addresses.thread_authority,
        );
        create_thread_in(
            &mut tx,
            &addresses.thread_authority,
            payer,
            thread_id,
            target,
            trigger.unwrap_or(Trigger::Manual),
            amount,
        )?;

        tx.create_account(
            payer,
            &addresses.switch,
            Switch::space(thread_id.len()),
            &cadence_switch_program::ID,
        )?;
        let switch = Switch::new(addresses.thread, thread_id.to_vec(), addresses.switch_bump);
        tx.store(&addresses.switch, &switch)?;

        tx.commit()
            .map_err(|err| self.lost_creation_race(err, &[addresses.switch, addresses.thread]))?;
        info!(
            "Switch {} paired with thread {}",
            addresses.switch, addresses.thread
        );
        Ok(addresses)
    }

    /// Creates a thread owned by `authority`.
    pub fn create_thread(
        &self,
        authority: &Pubkey,
        payer: &Pubkey,
        id: &[u8],
        target: SerializableInstruction,
        trigger: Trigger,
        amount: u64,
    ) -> Result<Pubkey> {
        let mut tx = self.ledger.begin();
        let address = create_thread_in(&mut tx, authority, payer, id, target, trigger, amount)?;
        tx.commit()
            .map_err(|err| self.lost_creation_race(err, &[address]))?;
        info!("Created thread {}", address);
        Ok(address)
    }

    /// A creation that lost a commit race reports the account the winner created.
    fn lost_creation_race(&self, err: ClientError, created: &[Pubkey]) -> ClientError {
        match err {
            ClientError::WriteConflict(key) => created
                .iter()
                .find(|address| {
                    self.ledger
                        .get_account(address)
                        .is_some_and(|account| !account.data.is_empty())
                })
                .map_or(ClientError::WriteConflict(key), |address| {
                    ClientError::AlreadyInitialized(*address)
                }),
            other => other,
        }
    }

    /// Runs an execution of `thread` against the current ledger state without committing it.
    ///
    /// `expected_exec_count` is the execution count the caller observed, if any.
    pub fn prepare_exec(
        &self,
        thread_key: &Pubkey,
        signatory: &Pubkey,
        expected_exec_count: Option<u64>,
    ) -> Result<PreparedExec<'_>> {
        let mut tx = self.ledger.begin();
        let clock = tx.clock();
        let mut thread: Thread = tx.load(thread_key, &cadence_thread_program::ID)?;
        let program_error = |err| ClientError::from_program(err, *thread_key);

        let watched_account = match thread.trigger {
            Trigger::Account { address, .. } => Some((address, tx.existing_account(&address)?)),
            _ => None,
        };
        let watched = watched_account
            .as_ref()
            .map(|(address, account)| WatchedAccount {
                address: *address,
                data: &account.data,
            });
        let trigger_context = thread
            .begin_exec(&clock, expected_exec_count, watched.as_ref())
            .map_err(program_error)?;
        // The target observes the thread as executing.
        tx.store(thread_key, &thread)?;

        let instruction = thread.target.resolve(signatory);
        let program_id = instruction.program_id;
        let target = self
            .targets
            .get(&program_id)
            .ok_or(ClientError::UnknownProgram(program_id))?;
        debug!("Invoking {} for thread {}", program_id, thread_key);
        target
            .invoke(&mut tx, &instruction, &[*thread_key, *signatory])
            .map_err(|err| match err {
                ClientError::NotFound(key) => ClientError::NotFound(key),
                other => ClientError::TargetInvocationFailed {
                    program_id,
                    reason: other.to_string(),
                },
            })?;

        thread
            .complete_exec(&clock, trigger_context)
            .map_err(program_error)?;
        tx.store(thread_key, &thread)?;

        let exec_context = thread
            .exec_context
            .ok_or_else(|| ClientError::Program("execution context missing".to_string()))?;
        Ok(PreparedExec {
            tx,
            outcome: ExecOutcome {
                thread: *thread_key,
                exec_count: thread.exec_count,
                exec_context,
            },
        })
    }

    /// Executes `thread` if its trigger is active.
    pub fn execute(
        &self,
        thread_key: &Pubkey,
        signatory: &Pubkey,
        expected_exec_count: Option<u64>,
    ) -> Result<ExecOutcome> {
        self.prepare_exec(thread_key, signatory, expected_exec_count)?
            .commit()
    }

    /// Executes the thread paired with `switch`, flipping it.
    pub fn toggle_switch(&self, switch_key: &Pubkey, signatory: &Pubkey) -> Result<ExecOutcome> {
        let switch = crate::reader::fetch_switch(&self.ledger, switch_key)?;
        self.execute(&switch.thread, signatory, None)
    }

    /// Pauses or resumes a thread. Returns whether the thread is now paused.
    pub fn toggle_pause(&self, authority: &Pubkey, thread_key: &Pubkey) -> Result<bool> {
        let mut tx = self.ledger.begin();
        let mut thread: Thread = tx.load(thread_key, &cadence_thread_program::ID)?;
        if thread.authority.ne(authority) {
            return Err(ClientError::Unauthorized {
                signer: *authority,
                account: *thread_key,
            });
        }
        thread.paused = !thread.paused;
        tx.store(thread_key, &thread)?;
        tx.commit()?;
        info!("Thread {} paused: {}", thread_key, thread.paused);
        Ok(thread.paused)
    }
}

fn create_thread_in(
    tx: &mut Transaction<'_>,
    authority: &Pubkey,
    payer: &Pubkey,
    id: &[u8],
    target: SerializableInstruction,
    trigger: Trigger,
    amount: u64,
) -> Result<Pubkey> {
    let (address, bump) = thread_address(authority, id)?;
    trigger
        .validate(&tx.clock())
        .map_err(|err| ClientError::from_program(err, address))?;

    tx.create_account(
        payer,
        &address,
        Thread::space(id, &target, &trigger),
        &cadence_thread_program::ID,
    )?;
    let thread = Thread::new(*authority, bump, id.to_vec(), target, trigger, tx.clock());
    tx.store(&address, &thread)?;
    tx.transfer(payer, &address, amount)?;
    Ok(address)
}
