//! In-memory ledger
//!
//! Holds program accounts exactly as the programs persist them (discriminator and Borsh body) and
//! provides the one ordering guarantee the processor relies on: a transaction commits atomically,
//! and only if none of the accounts it read changed since it read them.

use crate::config::LedgerConfig;
use crate::error::{ClientError, Result};
use anchor_lang::prelude::{Pubkey, Rent};
use anchor_lang::solana_program::system_program;
use anchor_lang::{AccountDeserialize, AccountSerialize};
use cadence_thread_program::state::ClockData;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A single account stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAccount {
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

impl LedgerAccount {
    /// A data-less account owned by the system program.
    pub fn wallet(lamports: u64) -> Self {
        Self {
            owner: system_program::ID,
            lamports,
            data: Vec::new(),
        }
    }

    /// Decodes the account as an Anchor account of type `T`.
    pub fn deserialize<T: AccountDeserialize>(&self, address: &Pubkey) -> Result<T> {
        T::try_deserialize(&mut self.data.as_slice()).map_err(|err| ClientError::AccountData {
            account: *address,
            reason: err.to_string(),
        })
    }

    /// Encodes `value` into the existing data buffer, which must be large enough.
    pub fn serialize<T: AccountSerialize>(&mut self, address: &Pubkey, value: &T) -> Result<()> {
        let mut encoded = Vec::with_capacity(self.data.len());
        value
            .try_serialize(&mut encoded)
            .map_err(|err| ClientError::AccountData {
                account: *address,
                reason: err.to_string(),
            })?;
        if encoded.len() > self.data.len() {
            return Err(ClientError::AccountData {
                account: *address,
                reason: format!(
                    "encoded size {} exceeds account size {}",
                    encoded.len(),
                    self.data.len()
                ),
            });
        }
        self.data[..encoded.len()].copy_from_slice(&encoded);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct VersionedAccount {
    account: LedgerAccount,
    version: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, VersionedAccount>,
    slot: u64,
    next_version: u64,
}

/// Thread-safe account store with a slot clock.
#[derive(Debug)]
pub struct Ledger {
    state: RwLock<LedgerState>,
    config: LedgerConfig,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                slot: 1,
                ..Default::default()
            }),
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn slot(&self) -> u64 {
        self.state.read().slot
    }

    /// The cluster clock at the current slot.
    pub fn clock(&self) -> ClockData {
        self.clock_at(self.slot())
    }

    fn clock_at(&self, slot: u64) -> ClockData {
        let elapsed_ms = slot.saturating_mul(self.config.slot_duration_ms);
        ClockData {
            slot,
            epoch: slot / self.config.slots_per_epoch.max(1),
            unix_timestamp: self
                .config
                .genesis_timestamp
                .saturating_add((elapsed_ms / 1_000) as i64),
        }
    }

    /// Moves the clock forward by `slots` and returns the new clock.
    pub fn advance_slots(&self, slots: u64) -> ClockData {
        let slot = {
            let mut state = self.state.write();
            state.slot = state.slot.saturating_add(slots);
            state.slot
        };
        self.clock_at(slot)
    }

    /// Moves the clock forward until at least `seconds` of unix time have elapsed.
    pub fn advance_seconds(&self, seconds: u64) -> ClockData {
        let slots = (seconds.saturating_mul(1_000)).div_ceil(self.config.slot_duration_ms.max(1));
        self.advance_slots(slots.max(1))
    }

    /// Minimum balance for an account holding `space` bytes.
    pub fn minimum_balance(&self, space: usize) -> u64 {
        if self.config.charge_rent {
            Rent::default().minimum_balance(space)
        } else {
            0
        }
    }

    pub fn get_account(&self, address: &Pubkey) -> Option<LedgerAccount> {
        self.state
            .read()
            .accounts
            .get(address)
            .map(|entry| entry.account.clone())
    }

    /// Credits `lamports` to `address`, creating a wallet account if needed.
    pub fn airdrop(&self, address: &Pubkey, lamports: u64) {
        let mut state = self.state.write();
        state.next_version += 1;
        let version = state.next_version;
        let entry = state
            .accounts
            .entry(*address)
            .or_insert_with(|| VersionedAccount {
                account: LedgerAccount::wallet(0),
                version,
            });
        entry.account.lamports = entry.account.lamports.saturating_add(lamports);
        entry.version = version;
    }

    /// Opens a transaction against the current slot.
    pub fn begin(&self) -> Transaction<'_> {
        Transaction {
            ledger: self,
            clock: self.clock(),
            reads: HashMap::new(),
            writes: HashMap::new(),
        }
    }

    fn read_versioned(&self, address: &Pubkey) -> (Option<LedgerAccount>, Option<u64>) {
        match self.state.read().accounts.get(address) {
            Some(entry) => (Some(entry.account.clone()), Some(entry.version)),
            None => (None, None),
        }
    }

    fn commit(&self, reads: HashMap<Pubkey, Option<u64>>, writes: HashMap<Pubkey, LedgerAccount>) -> Result<()> {
        let mut state = self.state.write();

        for (address, observed) in reads.iter() {
            let current = state.accounts.get(address).map(|entry| entry.version);
            if current != *observed {
                debug!("Rejecting commit: {} changed since it was read", address);
                return Err(ClientError::WriteConflict(*address));
            }
        }

        let written = writes.len();
        for (address, account) in writes {
            state.next_version += 1;
            let version = state.next_version;
            state
                .accounts
                .insert(address, VersionedAccount { account, version });
        }
        debug!("Committed {} account(s) at slot {}", written, state.slot);
        Ok(())
    }
}

/// A set of reads and buffered writes applied atomically on [`Transaction::commit`].
///
/// Dropping a transaction discards its writes.
#[derive(Debug)]
pub struct Transaction<'a> {
    ledger: &'a Ledger,
    clock: ClockData,
    reads: HashMap<Pubkey, Option<u64>>,
    writes: HashMap<Pubkey, LedgerAccount>,
}

impl<'a> Transaction<'a> {
    /// The clock every instruction in this transaction observes.
    pub fn clock(&self) -> ClockData {
        self.clock
    }

    pub fn ledger(&self) -> &'a Ledger {
        self.ledger
    }

    /// Reads an account, preferring this transaction's own pending writes.
    pub fn account(&mut self, address: &Pubkey) -> Option<LedgerAccount> {
        if let Some(account) = self.writes.get(address) {
            return Some(account.clone());
        }
        let (account, version) = self.ledger.read_versioned(address);
        self.reads.entry(*address).or_insert(version);
        account
    }

    /// Reads an account that must exist.
    pub fn existing_account(&mut self, address: &Pubkey) -> Result<LedgerAccount> {
        self.account(address).ok_or(ClientError::NotFound(*address))
    }

    /// Reads and decodes an Anchor account owned by `owner`.
    pub fn load<T: AccountDeserialize>(&mut self, address: &Pubkey, owner: &Pubkey) -> Result<T> {
        let account = self.existing_account(address)?;
        if account.owner.ne(owner) {
            return Err(ClientError::AccountData {
                account: *address,
                reason: format!("owned by {}, expected {}", account.owner, owner),
            });
        }
        account.deserialize(address)
    }

    /// Re-encodes an existing Anchor account in place.
    pub fn store<T: AccountSerialize>(&mut self, address: &Pubkey, value: &T) -> Result<()> {
        let mut account = self.existing_account(address)?;
        account.serialize(address, value)?;
        self.set_account(*address, account);
        Ok(())
    }

    pub fn set_account(&mut self, address: Pubkey, account: LedgerAccount) {
        if !self.reads.contains_key(&address) {
            let (_, version) = self.ledger.read_versioned(&address);
            self.reads.insert(address, version);
        }
        self.writes.insert(address, account);
    }

    pub fn transfer(&mut self, from: &Pubkey, to: &Pubkey, lamports: u64) -> Result<()> {
        if lamports == 0 {
            return Ok(());
        }
        let mut source = self.existing_account(from)?;
        if source.lamports < lamports {
            return Err(ClientError::InsufficientFunds {
                account: *from,
                needed: lamports,
                available: source.lamports,
            });
        }
        source.lamports -= lamports;
        self.set_account(*from, source);

        let mut destination = self
            .account(to)
            .unwrap_or_else(|| LedgerAccount::wallet(0));
        destination.lamports = destination.lamports.saturating_add(lamports);
        self.set_account(*to, destination);
        Ok(())
    }

    /// Creates an account of `space` zeroed bytes owned by `owner`, funded for rent by `payer`.
    pub fn create_account(
        &mut self,
        payer: &Pubkey,
        address: &Pubkey,
        space: usize,
        owner: &Pubkey,
    ) -> Result<()> {
        let existing = self.account(address);
        if let Some(existing) = existing.as_ref() {
            if !existing.data.is_empty() || existing.owner.ne(&system_program::ID) {
                return Err(ClientError::AlreadyInitialized(*address));
            }
        }
        let current = existing.as_ref().map(|account| account.lamports).unwrap_or(0);
        let rent = self.ledger.minimum_balance(space);
        self.transfer(payer, address, rent.saturating_sub(current))?;

        let mut account = self.existing_account(address).unwrap_or_else(|_| LedgerAccount::wallet(0));
        account.owner = *owner;
        account.data = vec![0; space];
        self.set_account(*address, account);
        Ok(())
    }

    /// Applies every buffered write, or none of them.
    pub fn commit(self) -> Result<()> {
        self.ledger.commit(self.reads, self.writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger::new(LedgerConfig::default())
    }

    #[test]
    fn test_clock_follows_slots() {
        let ledger = ledger();
        let start = ledger.clock();
        let later = ledger.advance_slots(5);
        assert_eq!(later.slot, start.slot + 5);
        assert!(later.unix_timestamp >= start.unix_timestamp);

        let after = ledger.advance_seconds(3);
        assert!(after.unix_timestamp >= later.unix_timestamp + 3);
    }

    #[test]
    fn test_commit_applies_writes() {
        let ledger = ledger();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        ledger.airdrop(&a, 1_000);

        let mut tx = ledger.begin();
        tx.transfer(&a, &b, 400).unwrap();
        assert_eq!(ledger.get_account(&a).unwrap().lamports, 1_000);
        tx.commit().unwrap();

        assert_eq!(ledger.get_account(&a).unwrap().lamports, 600);
        assert_eq!(ledger.get_account(&b).unwrap().lamports, 400);
    }

    #[test]
    fn test_dropped_transaction_changes_nothing() {
        let ledger = ledger();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        ledger.airdrop(&a, 1_000);

        {
            let mut tx = ledger.begin();
            tx.transfer(&a, &b, 400).unwrap();
        }
        assert_eq!(ledger.get_account(&a).unwrap().lamports, 1_000);
        assert!(ledger.get_account(&b).is_none());
    }

    #[test]
    fn test_stale_read_conflicts() {
        let ledger = ledger();
        let (a, b, c) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        ledger.airdrop(&a, 1_000);

        let mut first = ledger.begin();
        let mut second = ledger.begin();
        first.transfer(&a, &b, 100).unwrap();
        second.transfer(&a, &c, 100).unwrap();

        first.commit().unwrap();
        assert!(matches!(second.commit(), Err(ClientError::WriteConflict(key)) if key == a));
        assert_eq!(ledger.get_account(&a).unwrap().lamports, 900);
        assert!(ledger.get_account(&c).is_none());
    }

    #[test]
    fn test_insufficient_funds() {
        let ledger = ledger();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        ledger.airdrop(&a, 10);

        let mut tx = ledger.begin();
        assert!(matches!(
            tx.transfer(&a, &b, 11),
            Err(ClientError::InsufficientFunds { needed: 11, available: 10, .. })
        ));
    }

    #[test]
    fn test_create_account_charges_rent_once() {
        let ledger = ledger();
        let (payer, address, owner) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        ledger.airdrop(&payer, 1_000_000_000);
        let rent = ledger.minimum_balance(64);

        let mut tx = ledger.begin();
        tx.create_account(&payer, &address, 64, &owner).unwrap();
        assert!(matches!(
            tx.create_account(&payer, &address, 64, &owner),
            Err(ClientError::AlreadyInitialized(_))
        ));
        tx.commit().unwrap();

        let created = ledger.get_account(&address).unwrap();
        assert_eq!(created.owner, owner);
        assert_eq!(created.data.len(), 64);
        assert_eq!(created.lamports, rent);
        assert_eq!(
            ledger.get_account(&payer).unwrap().lamports,
            1_000_000_000 - rent
        );
    }
}
