use anchor_lang::prelude::*;

pub const SEED_THREAD: &[u8] = b"thread";

/// Current version of the Thread structure.
pub const CURRENT_THREAD_VERSION: u8 = 1;

/// Thread ids are PDA seeds and share their length limit.
pub const MAX_THREAD_ID_LEN: usize = 32;

/// Placeholder account in a thread's target, replaced by the executing signatory.
pub const PAYER_PUBKEY: Pubkey = pubkey!("CadencePayer1111111111111111111111111111111");
