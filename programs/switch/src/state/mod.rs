mod switch;

pub use switch::*;

pub use crate::constants::*;
