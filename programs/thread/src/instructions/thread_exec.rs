use anchor_lang::{prelude::*, solana_program::program::invoke_signed, AccountsExit};

use crate::{errors::ThreadError, state::*};

/// Accounts required by the `thread_exec` instruction.
///
/// The target's accounts follow as remaining accounts. Threads with an `Account` trigger must
/// include the watched account among them.
#[derive(Accounts)]
pub struct ThreadExec<'info> {
    /// The signatory.
    #[account(mut)]
    pub signatory: Signer<'info>,

    /// The thread to execute.
    #[account(
        mut,
        seeds = [
            SEED_THREAD,
            thread.authority.as_ref(),
            thread.id.as_slice(),
        ],
        bump = thread.bump,
    )]
    pub thread: Box<Account<'info, Thread>>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, ThreadExec<'info>>,
    expected_exec_count: Option<u64>,
) -> Result<()> {
    // Get accounts
    let clock: ClockData = Clock::get()?.into();
    let signatory = &ctx.accounts.signatory;
    let thread = &mut ctx.accounts.thread;

    let watched_info = match thread.trigger {
        Trigger::Account { address, .. } => Some(
            ctx.remaining_accounts
                .iter()
                .find(|account| account.key.eq(&address))
                .ok_or(ThreadError::TriggerNotReady)?,
        ),
        _ => None,
    };

    // Gate the execution and mark the thread as busy.
    let trigger_context = match watched_info {
        Some(info) => {
            let data = info.try_borrow_data()?;
            let watched = WatchedAccount {
                address: *info.key,
                data: &data[..],
            };
            thread.begin_exec(&clock, expected_exec_count, Some(&watched))?
        }
        None => thread.begin_exec(&clock, expected_exec_count, None)?,
    };

    // Persist the executing status so nested calls observe it.
    thread.exit(&crate::ID)?;

    // Invoke the target with the thread as signer.
    let instruction = thread.target.resolve(signatory.key);
    let mut account_infos = ctx.remaining_accounts.to_vec();
    account_infos.push(thread.to_account_info());
    account_infos.push(signatory.to_account_info());
    invoke_signed(
        &instruction,
        &account_infos,
        &[&[
            SEED_THREAD,
            thread.authority.as_ref(),
            thread.id.as_slice(),
            &[thread.bump],
        ]],
    )?;

    // Verify the inner instruction did not write data to the signatory address.
    require!(signatory.data_is_empty(), ThreadError::UnauthorizedWrite);

    thread.complete_exec(&clock, trigger_context)?;
    msg!(
        "Thread {} executed at slot {} (exec #{})",
        thread.key(),
        clock.slot,
        thread.exec_count
    );

    Ok(())
}
