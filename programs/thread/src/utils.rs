use std::str::FromStr;

use anchor_lang::{
    prelude::*,
    solana_program::hash::hash,
    system_program::{allocate, assign, create_account, transfer, Allocate, Assign, CreateAccount, Transfer},
};
use cadence_cron::Schedule;
use chrono::{DateTime, Utc};

use crate::errors::ThreadError;

/// Calculate the next timestamp for a cron schedule.
///
/// `Ok(None)` means the schedule has no moment left after `after`.
pub fn next_timestamp(after: i64, schedule: &str) -> Result<Option<i64>> {
    let schedule = Schedule::from_str(schedule).map_err(|_| error!(ThreadError::InvalidSchedule))?;
    let after = DateTime::<Utc>::from_timestamp(after, 0).ok_or(ThreadError::InvalidThreadState)?;
    Ok(schedule.next_after(&after).map(|datetime| datetime.timestamp()))
}

/// Hash of the `size` bytes at `offset`, clamped to the data length.
pub fn account_data_hash(data: &[u8], offset: u64, size: u64) -> u64 {
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(data.len());
    let end = start
        .saturating_add(usize::try_from(size).unwrap_or(usize::MAX))
        .min(data.len());
    let digest = hash(&data[start..end]).to_bytes();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(prefix)
}

/// Creates a program derived account owned by `owner`, funded for rent by `payer`.
///
/// Accounts that already hold lamports are topped up, allocated and assigned instead, since the
/// system program refuses `create_account` on them.
pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    new_account: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    owner: &Pubkey,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    let rent = Rent::get()?.minimum_balance(space);
    let current_lamports = new_account.lamports();

    if current_lamports == 0 {
        return create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: new_account.clone(),
                },
                &[signer_seeds],
            ),
            rent,
            space as u64,
            owner,
        );
    }

    let top_up = rent.saturating_sub(current_lamports);
    if top_up > 0 {
        transfer(
            CpiContext::new(
                system_program.clone(),
                Transfer {
                    from: payer.clone(),
                    to: new_account.clone(),
                },
            ),
            top_up,
        )?;
    }
    allocate(
        CpiContext::new_with_signer(
            system_program.clone(),
            Allocate {
                account_to_allocate: new_account.clone(),
            },
            &[signer_seeds],
        ),
        space as u64,
    )?;
    assign(
        CpiContext::new_with_signer(
            system_program.clone(),
            Assign {
                account_to_assign: new_account.clone(),
            },
            &[signer_seeds],
        ),
        owner,
    )
}

/// Writes an Anchor account (discriminator and body) into freshly created account data.
pub fn write_account<T: AccountSerialize>(account: &AccountInfo, value: &T) -> Result<()> {
    let mut data = account.try_borrow_mut_data()?;
    let mut dst: &mut [u8] = &mut data;
    value.try_serialize(&mut dst)
}
