mod clock;
mod instruction;
mod thread;
mod trigger;

pub use clock::*;
pub use instruction::*;
pub use thread::*;
pub use trigger::*;

pub use crate::constants::*;
