//! Cadence client
//!
//! Off-chain side of the thread and switch programs: address derivation, an in-memory ledger,
//! a native processor that runs the programs' own state logic against it, read accessors and a
//! polling scheduler.
//!
//! ## Usage
//!
//! ```ignore
//! let config = ClientConfig::load("cadence.toml")?;
//! cadence_client::logging::init(&config.logging);
//!
//! let ledger = Arc::new(Ledger::new(config.ledger.clone()));
//! let processor = Processor::new(ledger);
//! let addresses = processor.initialize(&payer, b"my-thread", None, 0)?;
//! processor.toggle_switch(&addresses.switch, &payer)?;
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod pda;
pub mod processor;
pub mod reader;
pub mod scheduler;
pub mod targets;

// Re-exports
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use ledger::{Ledger, LedgerAccount, Transaction};
pub use pda::SwitchAddresses;
pub use processor::{ExecOutcome, PreparedExec, Processor};
pub use reader::{fetch_exec_context, fetch_switch, fetch_thread};
pub use scheduler::{Scheduler, TickReport};
pub use targets::{SwitchProgram, TargetProgram, TargetRegistry};
