//! Type aliases for commonly shared state.
//!
//! The drawing session is single-threaded by contract. Hosts that receive
//! pointer events on several threads wrap it in [`ThreadSafe`] so event
//! handling is serialized.
//!
//! ```rust,ignore
//! use flatdraw_core::types::*;
//!
//! let session: ThreadSafe<DrawingSession> = DrawingSession::default().into_shared();
//! session.lock().pointer_down(10.0, 10.0);
//! ```

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex` for better performance than `std::sync::Mutex`.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Wrap a value in [`ThreadSafe`]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
