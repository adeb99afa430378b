//! A switch whose state is flipped by an automation thread.
//!
//! `initialize` creates the switch together with a thread owned by this program's authority PDA.
//! The thread's target is `toggle_switch`, which only the paired thread may sign.

pub mod constants;
pub mod errors;
pub mod state;

mod instructions;

use anchor_lang::prelude::*;
use cadence_thread_program::state::Trigger;
use instructions::*;

declare_id!("GMJTLeeyZiv6gJfHK3c7yRoY5HVm2BUSkyDdUvRuAFA");

#[program]
pub mod switch_program {
    use super::*;

    /// Creates the switch and its thread. The trigger defaults to `Manual`.
    pub fn initialize(
        ctx: Context<Initialize>,
        thread_id: Vec<u8>,
        trigger: Option<Trigger>,
        amount: u64,
    ) -> Result<()> {
        initialize::handler(ctx, thread_id, trigger, amount)
    }

    /// Flips the switch. Signed by the paired thread.
    pub fn toggle_switch(ctx: Context<ToggleSwitch>) -> Result<()> {
        toggle_switch::handler(ctx)
    }
}
