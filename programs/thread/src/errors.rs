//! Errors thrown by the program.

use anchor_lang::prelude::*;

/// Errors for the Cadence thread program.
#[error_code]
pub enum CadenceThreadError {
    #[msg("Thread ids must not be empty")]
    InvalidThreadId,

    #[msg("Thread ids are limited to 32 bytes")]
    ThreadIdTooLong,

    /// Thrown if no bump yields a valid program address for the seeds.
    #[msg("The thread address could not be derived")]
    DerivationFailed,

    #[msg("The provided thread account does not match the derived address")]
    InvalidThreadAddress,

    #[msg("A thread already exists for this authority and id")]
    AlreadyInitialized,

    /// Thrown if a thread has an invalid state and cannot complete the operation.
    #[msg("The thread is in an invalid state")]
    InvalidThreadState,

    #[msg("The cron schedule could not be parsed")]
    InvalidSchedule,

    #[msg("The trigger is invalid")]
    InvalidTrigger,

    /// Thrown if an exec instruction is invalid because the thread's trigger condition has not been met.
    #[msg("The trigger condition has not been activated")]
    TriggerNotReady,

    /// Thrown if the thread is executing, already executed in this slot, or changed since the caller observed it.
    #[msg("Another execution of this thread is in flight or has already landed")]
    TriggerConflict,

    /// Thrown if a request is invalid because the thread is currently paused.
    #[msg("The thread is currently paused")]
    ThreadPaused,

    /// Thrown if an inner instruction attempted to write to the signatory.
    #[msg("Inner instruction attempted to write to an unauthorized address")]
    UnauthorizedWrite,

    #[msg("MathOverflow")]
    MathOverflow,
}

/// Alias for CadenceThreadError
pub use CadenceThreadError as ThreadError;
