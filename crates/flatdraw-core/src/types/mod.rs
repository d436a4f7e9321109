//! Type aliases for shared state.
//!
//! - [`aliases`]: `Arc<Mutex<T>>` wrapper used when a
//!   host dispatches input events from more than one thread.

pub mod aliases;

pub use aliases::*;
