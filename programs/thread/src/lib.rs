//! This program allows users to create automation threads on Solana. A thread stores one target
//! instruction and a trigger condition. Whenever the trigger is active, anyone may execute the
//! thread, and the thread signs the target instruction on behalf of its authority.
//!
//! Every thread keeps an execution record that only moves forward: at most one execution lands per
//! slot, and an execution either completes in full or leaves the thread untouched.

pub mod constants;
pub mod errors;
pub mod state;
pub mod utils;

mod instructions;

use anchor_lang::prelude::*;
use instructions::*;
use state::*;

declare_id!("3sFRo9FwkrGgYAp8sHAUMse2v9HFUthNjTNVXg5Mbvrf");

#[program]
pub mod thread_program {
    use super::*;

    /// Creates a new automation thread.
    pub fn thread_create(
        ctx: Context<ThreadCreate>,
        amount: u64,
        id: Vec<u8>,
        target: SerializableInstruction,
        trigger: Trigger,
    ) -> Result<()> {
        thread_create::handler(ctx, amount, id, target, trigger)
    }

    /// Invokes the thread's target if its trigger condition is active.
    pub fn thread_exec<'info>(
        ctx: Context<'_, '_, '_, 'info, ThreadExec<'info>>,
        expected_exec_count: Option<u64>,
    ) -> Result<()> {
        thread_exec::handler(ctx, expected_exec_count)
    }

    /// Pauses or resumes a thread.
    pub fn thread_toggle(ctx: Context<ThreadToggle>) -> Result<()> {
        thread_toggle::handler(ctx)
    }
}
