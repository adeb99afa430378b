//! Test helpers for the switch program's Mollusk tests
//!
//! Both program binaries must be built into target/deploy first; `cargo test-sbf` does that and
//! enables the `test-sbf` feature these tests are gated on.
#![allow(dead_code)]

pub mod accounts;
pub mod instructions;

pub use accounts::*;
pub use instructions::*;

use mollusk_svm::{program::loader_keys::LOADER_V3, Mollusk};

/// Setup Mollusk with the switch program and the thread program it calls into.
pub fn setup_mollusk() -> Mollusk {
    // From programs/switch/, go up 2 levels to workspace root
    let deploy_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/deploy");
    std::env::set_var("SBF_OUT_DIR", deploy_dir);

    let mut mollusk = Mollusk::new(&cadence_switch_program::ID, "cadence_switch_program");
    mollusk.add_program(
        &cadence_thread_program::ID,
        "cadence_thread_program",
        &LOADER_V3,
    );
    mollusk
}

/// Anchor custom errors start at 6000.
pub fn error_code(code: u32) -> u32 {
    anchor_lang::error::ERROR_CODE_OFFSET + code
}
