pub const SWITCH_SEED: &[u8] = b"switch-test";

/// Seed of the PDA that owns every thread created by this program.
pub const THREAD_AUTHORITY_SEED: &[u8] = b"authority-test";
