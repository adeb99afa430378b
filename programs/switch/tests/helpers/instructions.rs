//! Instruction builders for Mollusk tests

use {
    anchor_lang::{InstructionData, ToAccountMetas},
    cadence_switch_program::state::{find_thread_authority, Switch},
    cadence_thread_program::state::{Thread, Trigger},
    solana_sdk::{
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
        system_program,
    },
};

/// The addresses of a switch and its thread.
#[derive(Clone, Copy, Debug)]
pub struct Pair {
    pub switch: Pubkey,
    pub thread: Pubkey,
    pub thread_authority: Pubkey,
}

impl Pair {
    pub fn derive(thread_id: &[u8]) -> Self {
        let (switch, _) = Switch::find_address(thread_id).unwrap();
        let (thread_authority, _) = find_thread_authority().unwrap();
        let thread = Thread::pubkey(&thread_authority, thread_id).unwrap();
        Self {
            switch,
            thread,
            thread_authority,
        }
    }
}

/// Build initialize instruction
///
/// Accounts:
/// 0. switch (writable)
/// 1. payer (writable, signer)
/// 2. system_program
/// 3. thread_program
/// 4. thread (writable)
/// 5. thread_authority
pub fn build_initialize(payer: Pubkey, thread_id: &[u8], trigger: Option<Trigger>) -> Instruction {
    let pair = Pair::derive(thread_id);
    Instruction {
        program_id: cadence_switch_program::ID,
        accounts: cadence_switch_program::accounts::Initialize {
            switch: pair.switch,
            payer,
            system_program: system_program::id(),
            thread_program: cadence_thread_program::ID,
            thread: pair.thread,
            thread_authority: pair.thread_authority,
        }
        .to_account_metas(None),
        data: cadence_switch_program::instruction::Initialize {
            thread_id: thread_id.to_vec(),
            trigger,
            amount: 0,
        }
        .data(),
    }
}

/// Build thread_exec instruction for a switch's thread
///
/// Accounts:
/// 0. signatory (writable, signer)
/// 1. thread (writable)
/// 2. switch (writable) - remaining accounts of the toggle_switch target
/// 3. thread_authority
/// 4. switch program
pub fn build_thread_exec(
    signatory: Pubkey,
    pair: &Pair,
    expected_exec_count: Option<u64>,
) -> Instruction {
    let mut accounts = cadence_thread_program::accounts::ThreadExec {
        signatory,
        thread: pair.thread,
    }
    .to_account_metas(None);
    accounts.extend([
        AccountMeta::new(pair.switch, false),
        AccountMeta::new_readonly(pair.thread_authority, false),
        AccountMeta::new_readonly(cadence_switch_program::ID, false),
    ]);

    Instruction {
        program_id: cadence_thread_program::ID,
        accounts,
        data: cadence_thread_program::instruction::ThreadExec {
            expected_exec_count,
        }
        .data(),
    }
}

/// Build a top-level toggle_switch instruction, as if sent outside of a thread
pub fn build_toggle_switch(
    payer: Pubkey,
    switch: Pubkey,
    thread: Pubkey,
    thread_authority: Pubkey,
    thread_signs: bool,
) -> Instruction {
    let mut accounts = cadence_switch_program::accounts::ToggleSwitch {
        switch,
        thread,
        thread_authority,
        payer,
    }
    .to_account_metas(None);
    for meta in accounts.iter_mut().filter(|meta| meta.pubkey == thread) {
        meta.is_signer = thread_signs;
    }

    Instruction {
        program_id: cadence_switch_program::ID,
        accounts,
        data: cadence_switch_program::instruction::ToggleSwitch {}.data(),
    }
}
