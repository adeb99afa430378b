use anchor_lang::prelude::*;

#[error_code]
pub enum SwitchError {
    #[msg("Thread ids must hold between 1 and 32 bytes")]
    InvalidThreadId,

    #[msg("No program address exists for these seeds")]
    DerivationFailed,

    #[msg("The switch account does not match the derived address")]
    InvalidSwitchAddress,

    #[msg("The thread account does not match the derived address")]
    InvalidThreadAddress,

    #[msg("A switch already exists for this thread id")]
    AlreadyInitialized,

    #[msg("The thread is not owned by the switch's thread authority")]
    InvalidThreadAuthority,

    #[msg("The thread is not paired with this switch")]
    ThreadMismatch,
}
