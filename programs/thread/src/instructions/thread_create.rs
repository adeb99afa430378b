use anchor_lang::{
    prelude::*,
    solana_program::system_program,
    system_program::{transfer, Transfer},
};

use crate::{
    errors::ThreadError,
    state::*,
    utils::{create_pda_account, write_account},
};

/// Accounts required by the `thread_create` instruction.
#[derive(Accounts)]
pub struct ThreadCreate<'info> {
    /// The authority (owner) of the thread.
    #[account()]
    pub authority: Signer<'info>,

    /// The payer for account initializations.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The Solana system program.
    #[account(address = system_program::ID)]
    pub system_program: Program<'info, System>,

    /// CHECK: The thread to be created. Its address is derived and checked by the handler so that
    /// invalid ids surface as errors instead of failing seed derivation.
    #[account(mut)]
    pub thread: UncheckedAccount<'info>,
}

pub fn handler(
    ctx: Context<ThreadCreate>,
    amount: u64,
    id: Vec<u8>,
    target: SerializableInstruction,
    trigger: Trigger,
) -> Result<()> {
    // Get accounts
    let authority = &ctx.accounts.authority;
    let payer = &ctx.accounts.payer;
    let system_program = &ctx.accounts.system_program;
    let thread = &ctx.accounts.thread;

    let (address, bump) = Thread::find_address(&authority.key(), &id)?;
    require_keys_eq!(thread.key(), address, ThreadError::InvalidThreadAddress);
    require!(
        thread.data_is_empty() && thread.owner.eq(&system_program::ID),
        ThreadError::AlreadyInitialized
    );
    let clock = ClockData::from(Clock::get()?);
    trigger.validate(&clock)?;

    // Create the account
    let space = Thread::space(&id, &target, &trigger);
    create_pda_account(
        &payer.to_account_info(),
        &thread.to_account_info(),
        &system_program.to_account_info(),
        space,
        &crate::ID,
        &[SEED_THREAD, authority.key().as_ref(), id.as_slice(), &[bump]],
    )?;

    // Initialize the thread
    let state = Thread::new(authority.key(), bump, id, target, trigger, clock);
    write_account(&thread.to_account_info(), &state)?;

    // Transfer SOL from payer to the thread.
    if amount > 0 {
        transfer(
            CpiContext::new(
                system_program.to_account_info(),
                Transfer {
                    from: payer.to_account_info(),
                    to: thread.to_account_info(),
                },
            ),
            amount,
        )?;
    }

    msg!("Created thread {} ({})", thread.key(), state.name);
    Ok(())
}
