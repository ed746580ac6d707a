//! Owning-thread verification for bridge objects.
//!
//! Every bridge object and every executor belongs to exactly one thread,
//! the *owning thread*: the thread that reads and writes the property cache
//! directly and on which all signals fire. This module provides the
//! affinity tracker used to verify that contract.
//!
//! Two levels of checking are provided:
//!
//! - **Debug assertions** (`debug_assert_owning_thread`): Only active in
//!   debug builds. Used liberally in bridge accessors for zero-cost
//!   production performance.
//!
//! - **Runtime assertions** (`assert_owning_thread`): Always active. Used
//!   where an off-thread call would corrupt unsynchronized state, such as
//!   draining the executor's queue.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::affinity::ThreadAffinity;
//!
//! struct Cache {
//!     affinity: ThreadAffinity,
//!     value: std::cell::Cell<i32>,
//! }
//!
//! impl Cache {
//!     fn new() -> Self {
//!         Self {
//!             affinity: ThreadAffinity::current(),
//!             value: std::cell::Cell::new(0),
//!         }
//!     }
//!
//!     fn set(&self, v: i32) {
//!         self.affinity.debug_assert_owning_thread();
//!         self.value.set(v);
//!     }
//! }
//! ```

use std::thread::ThreadId;

/// Records the thread that owns an object and verifies later accesses.
///
/// The affinity is fixed at construction and never changes; an object's
/// owning thread is the thread it was created on.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create an affinity tracker bound to the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread is the owning thread.
    #[inline]
    pub fn is_owning_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that we are on the owning thread.
    ///
    /// This always runs (debug and release builds).
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message if called from a different thread.
    /// An off-thread access is a contract violation, not a recoverable
    /// error: continuing would risk silently corrupted UI state.
    #[inline]
    pub fn assert_owning_thread(&self) {
        self.assert_owning_thread_with_msg("object accessed from a non-owning thread")
    }

    /// Assert that we are on the owning thread, with a custom message.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    pub fn assert_owning_thread_with_msg(&self, msg: &str) {
        if !self.is_owning_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only assertion that we are on the owning thread.
    ///
    /// This is a no-op in release builds.
    #[inline]
    pub fn debug_assert_owning_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_owning_thread();
    }

    /// Debug-only assertion with a custom message.
    #[inline]
    pub fn debug_assert_owning_thread_with_msg(&self, msg: &str) {
        #[cfg(debug_assertions)]
        self.assert_owning_thread_with_msg(msg);
        #[cfg(not(debug_assertions))]
        let _ = msg;
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "\n\
            ══════════════════════════════════════════════════════════════════════\n\
            OWNING-THREAD VIOLATION\n\
            ══════════════════════════════════════════════════════════════════════\n\
            \n\
            {msg}\n\
            \n\
            Object is owned by thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            \n\
            Property getters/setters and direct invokable calls must run on\n\
            the thread that owns the bridge object. The property cache is not\n\
            synchronized for cross-thread reads.\n\
            \n\
            POSSIBLE SOLUTIONS:\n\
            \n\
            1. Route the work through an UpdateRequester:\n\
               let requester = bridge.update_requester();\n\
               requester.request_update();\n\
            \n\
            2. Post a task to the owning thread's executor:\n\
               handle.post(move || bridge.set_value(v));\n\
            \n\
            ══════════════════════════════════════════════════════════════════════",
            self.thread_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_owning_thread());
        // Should not panic
        affinity.assert_owning_thread();
    }

    #[test]
    fn test_affinity_different_thread() {
        let affinity = ThreadAffinity::current();

        let result = Arc::new(AtomicBool::new(false));
        let result_clone = result.clone();

        let handle = std::thread::spawn(move || {
            result_clone.store(!affinity.is_owning_thread(), Ordering::SeqCst);
        });

        handle.join().unwrap();
        assert!(
            result.load(Ordering::SeqCst),
            "is_owning_thread() should return false from a different thread"
        );
    }

    #[test]
    fn test_affinity_panic_on_wrong_thread() {
        let affinity = ThreadAffinity::current();

        let result = std::thread::spawn(move || {
            affinity.assert_owning_thread();
        })
        .join();

        assert!(result.is_err(), "Expected thread to panic with affinity violation");
    }

    #[test]
    fn test_affinity_clone() {
        let affinity1 = ThreadAffinity::current();
        let affinity2 = affinity1;

        assert_eq!(affinity1.thread_id(), affinity2.thread_id());
        assert!(affinity2.is_owning_thread());
    }
}
