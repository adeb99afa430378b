//! Read accessors for switch and thread accounts

use crate::error::{ClientError, Result};
use crate::ledger::Ledger;
use anchor_lang::prelude::Pubkey;
use cadence_switch_program::state::Switch;
use cadence_thread_program::state::{ExecContext, Thread};

fn fetch<T: anchor_lang::AccountDeserialize>(
    ledger: &Ledger,
    address: &Pubkey,
    owner: &Pubkey,
) -> Result<T> {
    let account = ledger
        .get_account(address)
        .ok_or(ClientError::NotFound(*address))?;
    if account.owner.ne(owner) {
        return Err(ClientError::AccountData {
            account: *address,
            reason: format!("owned by {}, expected {}", account.owner, owner),
        });
    }
    account.deserialize(address)
}

pub fn fetch_switch(ledger: &Ledger, address: &Pubkey) -> Result<Switch> {
    fetch(ledger, address, &cadence_switch_program::ID)
}

pub fn fetch_thread(ledger: &Ledger, address: &Pubkey) -> Result<Thread> {
    fetch(ledger, address, &cadence_thread_program::ID)
}

/// The thread's last execution record, `None` until it first executes.
pub fn fetch_exec_context(ledger: &Ledger, address: &Pubkey) -> Result<Option<ExecContext>> {
    fetch_thread(ledger, address).map(|thread| thread.exec_context)
}
