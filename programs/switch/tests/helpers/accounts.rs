//! Account helpers for Mollusk tests
//!
//! Mollusk processes one instruction against the accounts it is handed. [`AccountStore`] carries
//! the resulting accounts from one instruction to the next.

use {
    anchor_lang::AccountDeserialize,
    cadence_switch_program::state::Switch,
    cadence_thread_program::state::Thread,
    mollusk_svm::{
        program::create_program_account_loader_v3,
        result::{Check, InstructionResult, ProgramResult},
        Mollusk,
    },
    solana_sdk::{account::Account, instruction::Instruction, pubkey::Pubkey, system_program},
    std::collections::HashMap,
};

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

/// Accounts that persist across instructions.
pub struct AccountStore {
    accounts: HashMap<Pubkey, Account>,
}

impl AccountStore {
    /// A store holding both programs and the system program.
    pub fn new() -> Self {
        let mut accounts = HashMap::from([system_program_account()]);
        for program_id in [cadence_thread_program::ID, cadence_switch_program::ID] {
            accounts.insert(program_id, create_program_account_loader_v3(&program_id));
        }
        Self { accounts }
    }

    pub fn set(&mut self, address: Pubkey, account: Account) {
        self.accounts.insert(address, account);
    }

    pub fn get(&self, address: &Pubkey) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Runs `instruction` and keeps its resulting accounts if it succeeds. Unknown accounts start
    /// out empty.
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

    pub fn switch(&self, address: &Pubkey) -> Switch {
        let account = self.get(address).expect("switch account");
        Switch::try_deserialize(&mut account.data.as_slice()).expect("switch data")
    }
}
