//! Native implementations of the programs a thread may target

use crate::error::{ClientError, Result};
use crate::ledger::Transaction;
use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::Discriminator;
use cadence_switch_program::errors::SwitchError;
use cadence_switch_program::state::{find_thread_authority, Switch};
use cadence_thread_program::state::Thread;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// A program the processor can invoke as a thread's target.
pub trait TargetProgram: Send + Sync {
    fn program_id(&self) -> Pubkey;

    /// Applies `instruction` to `tx`. `signers` holds every account that signed the invocation.
    fn invoke(&self, tx: &mut Transaction<'_>, instruction: &Instruction, signers: &[Pubkey]) -> Result<()>;
}

/// Target programs by program id.
#[derive(Clone)]
pub struct TargetRegistry {
    programs: HashMap<Pubkey, Arc<dyn TargetProgram>>,
}

impl TargetRegistry {
    pub fn empty() -> Self {
        Self {
            programs: HashMap::new(),
        }
    }

    pub fn register(&mut self, program: Arc<dyn TargetProgram>) {
        self.programs.insert(program.program_id(), program);
    }

    pub fn get(&self, program_id: &Pubkey) -> Option<&Arc<dyn TargetProgram>> {
        self.programs.get(program_id)
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(SwitchProgram));
        registry
    }
}

/// Native `toggle_switch`, enforcing the same account constraints as the on-chain program.
pub struct SwitchProgram;

impl SwitchProgram {
    fn check(condition: bool, error: SwitchError, account: Pubkey) -> Result<()> {
        if condition {
            Ok(())
        } else {
            Err(ClientError::from_program(error.into(), account))
        }
    }
}

impl TargetProgram for SwitchProgram {
    fn program_id(&self) -> Pubkey {
        cadence_switch_program::ID
    }

    fn invoke(&self, tx: &mut Transaction<'_>, instruction: &Instruction, signers: &[Pubkey]) -> Result<()> {
        let discriminator = cadence_switch_program::instruction::ToggleSwitch::DISCRIMINATOR;
        if !instruction.data.starts_with(discriminator) {
            return Err(ClientError::Program(format!(
                "unsupported switch instruction {:?}",
                instruction.data.get(..8)
            )));
        }

        let [switch_key, thread_key, authority_key, payer_key] = match instruction.accounts.as_slice() {
            [switch, thread, authority, payer, ..] => {
                [switch.pubkey, thread.pubkey, authority.pubkey, payer.pubkey]
            }
            accounts => {
                return Err(ClientError::Program(format!(
                    "toggle_switch expects 4 accounts, got {}",
                    accounts.len()
                )))
            }
        };
        for signer in [&thread_key, &payer_key] {
            if !signers.contains(signer) {
                return Err(ClientError::Unauthorized {
                    signer: *signer,
                    account: switch_key,
                });
            }
        }

        let mut switch: Switch = tx.load(&switch_key, &cadence_switch_program::ID)?;
        let thread: Thread = tx.load(&thread_key, &cadence_thread_program::ID)?;

        let (thread_authority, _) = find_thread_authority()
            .map_err(|err| ClientError::Derivation(err.to_string()))?;
        Self::check(
            authority_key.eq(&thread_authority),
            SwitchError::InvalidThreadAuthority,
            authority_key,
        )?;
        Self::check(
            thread.authority.eq(&thread_authority),
            SwitchError::InvalidThreadAuthority,
            thread_key,
        )?;
        let (expected_switch, _) = Switch::find_address(&thread.id)
            .map_err(|err| ClientError::Derivation(err.to_string()))?;
        Self::check(
            switch_key.eq(&expected_switch),
            SwitchError::InvalidSwitchAddress,
            switch_key,
        )?;
        Self::check(
            switch.thread.eq(&thread_key),
            SwitchError::ThreadMismatch,
            switch_key,
        )?;

        let switch_state = switch.toggle();
        tx.store(&switch_key, &switch)?;
        debug!("Switch {} is now {}", switch_key, switch_state);
        Ok(())
    }
}
