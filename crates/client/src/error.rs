//! Error types for the client

use anchor_lang::prelude::Pubkey;
use cadence_switch_program::errors::SwitchError;
use cadence_thread_program::errors::ThreadError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Address derivation failed: {0}")]
    Derivation(String),

    #[error("Account already initialized: {0}")]
    AlreadyInitialized(Pubkey),

    /// The thread is busy, already executed in this slot, or changed since it was observed.
    #[error("Trigger conflict on thread {0}")]
    TriggerConflict(Pubkey),

    #[error("Trigger condition not met for thread {0}")]
    TriggerNotReady(Pubkey),

    #[error("Thread {0} is paused")]
    ThreadPaused(Pubkey),

    #[error("Target program {program_id} failed: {reason}")]
    TargetInvocationFailed { program_id: Pubkey, reason: String },

    #[error("Account not found: {0}")]
    NotFound(Pubkey),

    #[error("Account {0} was modified by a concurrent transaction")]
    WriteConflict(Pubkey),

    #[error("Insufficient funds in {account}: need {needed}, have {available}")]
    InsufficientFunds {
        account: Pubkey,
        needed: u64,
        available: u64,
    },

    #[error("Invalid account data for {account}: {reason}")]
    AccountData { account: Pubkey, reason: String },

    #[error("Unknown program: {0}")]
    UnknownProgram(Pubkey),

    #[error("{signer} is not allowed to sign for {account}")]
    Unauthorized { signer: Pubkey, account: Pubkey },

    /// Any other error raised by program logic.
    #[error("Program error: {0}")]
    Program(String),
}

impl ClientError {
    /// Whether resubmitting the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::TriggerConflict(_)
                | ClientError::TriggerNotReady(_)
                | ClientError::WriteConflict(_)
                | ClientError::TargetInvocationFailed { .. }
        )
    }

    /// Maps an error raised by program logic while operating on `account`.
    pub fn from_program(err: anchor_lang::error::Error, account: Pubkey) -> Self {
        let is = |code: anchor_lang::error::Error| err == code;

        if is(ThreadError::InvalidThreadId.into())
            || is(ThreadError::ThreadIdTooLong.into())
            || is(ThreadError::DerivationFailed.into())
            || is(SwitchError::InvalidThreadId.into())
            || is(SwitchError::DerivationFailed.into())
        {
            ClientError::Derivation(err.to_string())
        } else if is(ThreadError::AlreadyInitialized.into())
            || is(SwitchError::AlreadyInitialized.into())
        {
            ClientError::AlreadyInitialized(account)
        } else if is(ThreadError::TriggerConflict.into()) {
            ClientError::TriggerConflict(account)
        } else if is(ThreadError::TriggerNotReady.into()) {
            ClientError::TriggerNotReady(account)
        } else if is(ThreadError::ThreadPaused.into()) {
            ClientError::ThreadPaused(account)
        } else {
            ClientError::Program(err.to_string())
        }
    }
}
