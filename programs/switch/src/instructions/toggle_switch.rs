use anchor_lang::prelude::*;
use cadence_thread_program::state::Thread;

use crate::{errors::SwitchError, state::*};

/// Accounts required by the `toggle_switch` instruction.
#[derive(Accounts)]
pub struct ToggleSwitch<'info> {
    /// The switch to flip.
    #[account(
        mut,
        seeds = [SWITCH_SEED, thread.id.as_slice()],
        bump = switch.bump,
        has_one = thread @ SwitchError::ThreadMismatch,
    )]
    pub switch: Account<'info, Switch>,

    /// The paired thread, signing through `thread_exec`.
    #[account(
        signer,
        constraint = thread.authority.eq(&thread_authority.key()) @ SwitchError::InvalidThreadAuthority,
    )]
    pub thread: Box<Account<'info, Thread>>,

    /// CHECK: Only its address matters.
    #[account(seeds = [THREAD_AUTHORITY_SEED], bump)]
    pub thread_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,
}

pub fn handler(ctx: Context<ToggleSwitch>) -> Result<()> {
    let switch = &mut ctx.accounts.switch;
    let switch_state = switch.toggle();
    msg!("Switch {} is now {}", switch.key(), switch_state);
    Ok(())
}
