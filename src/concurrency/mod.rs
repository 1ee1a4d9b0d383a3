//! Thread coordination primitives used by the asynchronous logger

pub mod channel;
pub mod pool;

pub use channel::{Channel, Signal};
pub use pool::{Pool, TaskHandle};
