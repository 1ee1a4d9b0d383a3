//! Emitter implementations

pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;
pub mod retry;
pub mod stream;

pub use console::{ConsoleEmitter, ConsoleTarget};
#[cfg(feature = "file")]
pub use file::FileEmitter;
pub use memory::{MemoryEmitter, MemorySink};
pub use retry::RetryingEmitter;
pub use stream::{FlushPolicy, StreamEmitter};

pub use crate::core::Emitter;
