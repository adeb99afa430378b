use anchor_lang::{prelude::*, solana_program::system_program};
use cadence_thread_program::{
    cpi::{accounts::ThreadCreate, thread_create},
    program::ThreadProgram,
    state::{Thread, Trigger},
    utils::{create_pda_account, write_account},
};

use crate::{errors::SwitchError, state::*};

/// Accounts required by the `initialize` instruction.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// CHECK: The switch to create, checked against its derived address by the handler.
    #[account(mut)]
    pub switch: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(address = system_program::ID)]
    pub system_program: Program<'info, System>,

    pub thread_program: Program<'info, ThreadProgram>,

    /// CHECK: Created by the thread program, which checks the address.
    #[account(mut)]
    pub thread: UncheckedAccount<'info>,

    /// CHECK: Signs for the thread through its seeds.
    #[account(seeds = [THREAD_AUTHORITY_SEED], bump)]
    pub thread_authority: UncheckedAccount<'info>,
}

pub fn handler(
    ctx: Context<Initialize>,
    thread_id: Vec<u8>,
    trigger: Option<Trigger>,
    amount: u64,
) -> Result<()> {
    // Get accounts
    let switch = &ctx.accounts.switch;
    let payer = &ctx.accounts.payer;
    let system_program = &ctx.accounts.system_program;
    let thread_program = &ctx.accounts.thread_program;
    let thread = &ctx.accounts.thread;
    let thread_authority = &ctx.accounts.thread_authority;

    let (switch_address, switch_bump) = Switch::find_address(&thread_id)?;
    require_keys_eq!(switch.key(), switch_address, SwitchError::InvalidSwitchAddress);
    require!(
        switch.data_is_empty() && switch.owner.eq(&system_program::ID),
        SwitchError::AlreadyInitialized
    );
    let thread_address = Thread::pubkey(&thread_authority.key(), &thread_id)?;
    require_keys_eq!(thread.key(), thread_address, SwitchError::InvalidThreadAddress);

    // Create the thread, signed by the authority PDA.
    let target = toggle_instruction(switch.key(), thread.key(), thread_authority.key());
    let authority_bump = ctx.bumps.thread_authority;
    thread_create(
        CpiContext::new_with_signer(
            thread_program.to_account_info(),
            ThreadCreate {
                authority: thread_authority.to_account_info(),
                payer: payer.to_account_info(),
                system_program: system_program.to_account_info(),
                thread: thread.to_account_info(),
            },
            &[&[THREAD_AUTHORITY_SEED, &[authority_bump]]],
        ),
        amount,
        thread_id.clone(),
        target,
        trigger.unwrap_or(Trigger::Manual),
    )?;

    // Create the switch.
    create_pda_account(
        &payer.to_account_info(),
        &switch.to_account_info(),
        &system_program.to_account_info(),
        Switch::space(thread_id.len()),
        &crate::ID,
        &[SWITCH_SEED, thread_id.as_slice(), &[switch_bump]],
    )?;
    let state = Switch::new(thread.key(), thread_id, switch_bump);
    write_account(&switch.to_account_info(), &state)?;

    msg!("Switch {} paired with thread {}", switch.key(), thread.key());
    Ok(())
}
