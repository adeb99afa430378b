pub mod thread_create;
pub mod thread_exec;
pub mod thread_toggle;

pub use thread_create::*;
pub use thread_exec::*;
pub use thread_toggle::*;
