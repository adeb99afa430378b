use anchor_lang::{prelude::*, solana_program::instruction::Instruction, InstructionData};
use cadence_thread_program::{constants::PAYER_PUBKEY, state::SerializableInstruction};

use crate::{constants::*, errors::SwitchError};

/// A boolean flipped by every execution of its paired thread.
#[account]
#[derive(Debug)]
pub struct Switch {
    pub switch_state: bool,
    /// The thread allowed to toggle this switch.
    pub thread: Pubkey,
    pub thread_id: Vec<u8>,
    pub bump: u8,
}

impl Switch {
    pub fn new(thread: Pubkey, thread_id: Vec<u8>, bump: u8) -> Self {
        Switch {
            switch_state: false,
            thread,
            thread_id,
            bump,
        }
    }

    pub fn space(thread_id_len: usize) -> usize {
        8 + 1 + 32 + 4 + thread_id_len + 1
    }

    /// Derive the address and bump of the switch paired with `thread_id`.
    pub fn find_address(thread_id: &[u8]) -> Result<(Pubkey, u8)> {
        require!(
            !thread_id.is_empty()
                && thread_id.len() <= cadence_thread_program::constants::MAX_THREAD_ID_LEN,
            SwitchError::InvalidThreadId
        );
        Pubkey::try_find_program_address(&[SWITCH_SEED, thread_id], &crate::ID)
            .ok_or_else(|| error!(SwitchError::DerivationFailed))
    }

    /// Flips the state and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.switch_state = !self.switch_state;
        self.switch_state
    }
}

/// Derive the authority that owns the switch program's threads.
pub fn find_thread_authority() -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(&[THREAD_AUTHORITY_SEED], &crate::ID)
        .ok_or_else(|| error!(SwitchError::DerivationFailed))
}

/// The `toggle_switch` instruction a thread invokes on every trigger.
pub fn toggle_instruction(
    switch: Pubkey,
    thread: Pubkey,
    thread_authority: Pubkey,
) -> SerializableInstruction {
    Instruction {
        program_id: crate::ID,
        accounts: crate::accounts::ToggleSwitch {
            switch,
            thread,
            thread_authority,
            payer: PAYER_PUBKEY,
        }
        .to_account_metas(Some(true)),
        data: crate::instruction::ToggleSwitch {}.data(),
    }
    .into()
}
