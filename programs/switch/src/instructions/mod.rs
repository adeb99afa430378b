pub mod initialize;
pub mod toggle_switch;

pub use initialize::*;
pub use toggle_switch::*;
