//! Address derivation for the switch and its thread

use anchor_lang::prelude::Pubkey;
use cadence_switch_program::state::{find_thread_authority, Switch};
use cadence_thread_program::state::Thread;

use crate::error::{ClientError, Result};

/// Every address involved in one switch/thread pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchAddresses {
    pub switch: Pubkey,
    pub switch_bump: u8,
    pub thread_authority: Pubkey,
    pub authority_bump: u8,
    pub thread: Pubkey,
    pub thread_bump: u8,
}

impl SwitchAddresses {
    pub fn derive(thread_id: &[u8]) -> Result<Self> {
        let (switch, switch_bump) = Switch::find_address(thread_id).map_err(derivation)?;
        let (thread_authority, authority_bump) = find_thread_authority().map_err(derivation)?;
        let (thread, thread_bump) = thread_address(&thread_authority, thread_id)?;
        Ok(Self {
            switch,
            switch_bump,
            thread_authority,
            authority_bump,
            thread,
            thread_bump,
        })
    }
}

/// Address and bump of the thread owned by `authority` under `id`.
pub fn thread_address(authority: &Pubkey, id: &[u8]) -> Result<(Pubkey, u8)> {
    Thread::find_address(authority, id).map_err(derivation)
}

fn derivation(err: anchor_lang::error::Error) -> ClientError {
    ClientError::Derivation(err.to_string())
}
