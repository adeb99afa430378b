//! Test helpers for the thread program's Mollusk tests
//!
//! The program binary must be built into target/deploy first; `cargo test-sbf` does that and
//! enables the `test-sbf` feature these tests are gated on.
#![allow(dead_code)]

use {
    anchor_lang::{
        solana_program::system_instruction, AccountDeserialize, InstructionData, ToAccountMetas,
    },
    cadence_thread_program::state::{SerializableInstruction, Thread, Trigger, PAYER_PUBKEY},
    mollusk_svm::{
        result::{Check, InstructionResult, ProgramResult},
        Mollusk,
    },
    solana_sdk::{
        account::Account,
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
        system_program,
    },
    std::collections::HashMap,
};

/// Setup Mollusk for testing
pub fn setup_mollusk() -> Mollusk {
    // From programs/thread/, go up 2 levels to workspace root
    let deploy_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/deploy");
    std::env::set_var("SBF_OUT_DIR", deploy_dir);

    Mollusk::new(&cadence_thread_program::ID, "cadence_thread_program")
}

/// Anchor custom errors start at 6000.
pub fn error_code(code: u32) -> u32 {
    anchor_lang::error::ERROR_CODE_OFFSET + code
}

/// Create a system-owned account with given lamports
pub fn system_account(lamports: u64) -> Account {
    Account {
        lamports,
        data: vec![],
        owner: system_program::id(),
        executable: false,
        rent_epoch: 0,
    }
}

/// Create a system program account tuple for test setup
pub fn system_program_account() -> (Pubkey, Account) {
    (
        system_program::id(),
        Account {
            lamports: 1,
            data: vec![],
            owner: solana_sdk::native_loader::id(),
            executable: true,
            rent_epoch: 0,
        },
    )
}

/// A target that pays `lamports` from whoever executes the thread to `recipient`.
pub fn payout_target(recipient: Pubkey, lamports: u64) -> SerializableInstruction {
    system_instruction::transfer(&PAYER_PUBKEY, &recipient, lamports).into()
}

/// Build thread_create instruction
///
/// Accounts:
/// 0. authority (signer)
/// 1. payer (writable, signer)
/// 2. system_program
/// 3. thread (writable)
pub fn build_thread_create(
    authority: Pubkey,
    payer: Pubkey,
    thread: Pubkey,
    id: &[u8],
    target: SerializableInstruction,
    trigger: Trigger,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: cadence_thread_program::ID,
        accounts: cadence_thread_program::accounts::ThreadCreate {
            authority,
            payer,
            system_program: system_program::id(),
            thread,
        }
        .to_account_metas(None),
        data: cadence_thread_program::instruction::ThreadCreate {
            amount,
            id: id.to_vec(),
            target,
            trigger,
        }
        .data(),
    }
}

/// Build thread_exec instruction, passing the payout target's accounts as remaining accounts
pub fn build_thread_exec(
    signatory: Pubkey,
    thread: Pubkey,
    recipient: Pubkey,
    expected_exec_count: Option<u64>,
) -> Instruction {
    let mut accounts = cadence_thread_program::accounts::ThreadExec { signatory, thread }
        .to_account_metas(None);
    accounts.extend([
        AccountMeta::new(recipient, false),
        AccountMeta::new_readonly(system_program::id(), false),
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

/// Build thread_toggle instruction
pub fn build_thread_toggle(authority: Pubkey, thread: Pubkey) -> Instruction {
    Instruction {
        program_id: cadence_thread_program::ID,
        accounts: cadence_thread_program::accounts::ThreadToggle { authority, thread }
            .to_account_metas(None),
        data: cadence_thread_program::instruction::ThreadToggle {}.data(),
    }
}

/// Accounts that persist across instructions.
pub struct AccountStore {
    accounts: HashMap<Pubkey, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::from([system_program_account()]),
        }
    }

    pub fn set(&mut self, address: Pubkey, account: Account) {
        self.accounts.insert(address, account);
    }

    pub fn get(&self, address: &Pubkey) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Runs `instruction` and keeps its resulting accounts if it succeeds.
    pub fn process(
        &mut self,
        mollusk: &Mollusk,
        instruction: &Instruction,
        checks: &[Check],
    ) -> InstructionResult {
        let mut keys: Vec<Pubkey> = Vec::new();
        for meta in &instruction.accounts {
            if !keys.contains(&meta.pubkey) {
                keys.push(meta.pubkey);
            }
        }
        let accounts: Vec<(Pubkey, Account)> = keys
            .into_iter()
            .map(|key| (key, self.accounts.get(&key).cloned().unwrap_or_default()))
            .collect();

        let result = mollusk.process_and_validate_instruction(instruction, &accounts, checks);
        if matches!(result.program_result, ProgramResult::Success) {
            for (key, account) in &result.resulting_accounts {
                self.accounts.insert(*key, account.clone());
            }
        }
        result
    }

    pub fn thread(&self, address: &Pubkey) -> Thread {
        let account = self.get(address).expect("thread account");
        Thread::try_deserialize(&mut account.data.as_slice()).expect("thread data")
    }
}
