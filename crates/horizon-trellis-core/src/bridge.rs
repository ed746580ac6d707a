//! The bridge object protocol.
//!
//! A *bridge object* is the UI-facing half of a bridged type: it owns
//! exactly one [`CoreObject`] (the domain logic), caches one
//! [`PropertyCell`] per exposed property, and fires one [`Signal`] per
//! property change. Generated glue defines the concrete bridge struct; this
//! module provides [`BridgeHost`], the runtime that the generated struct
//! embeds and routes every access through.
//!
//! # Lifecycle
//!
//! 1. The bridge struct is constructed with its core object and the owning
//!    thread's [`DispatchHandle`]; `initialised` starts false.
//! 2. [`run_initialise`](BridgeHost::run_initialise) runs the core's
//!    [`initialise`](CoreObject::initialise) hook, which may push initial
//!    values through the setters, silently, because initialisation has not
//!    completed. Afterwards `initialised` becomes true and never resets.
//! 3. Steady state: getters read the cache, setters run the change-detect
//!    protocol, invokables and update requests serialize on the core mutex.
//! 4. Dropping the bridge drops the core with it; outstanding
//!    [`UpdateRequester`](crate::requester::UpdateRequester) handles detach.
//!
//! # The setter protocol
//!
//! [`apply`](BridgeHost::apply) is the single point of truth for "did this
//! value actually change" and "was initialisation finished":
//!
//! - before initialisation completes: overwrite the cache and nothing else
//!   (no signal, no mutex, no core access);
//! - after: compare by value equality; an equal value is a no-op; a changed
//!   value overwrites the cache and queues the property's change signal to
//!   the owning thread.
//!
//! Core object setters deliberately do none of this (they are plain stores
//! on the core's own storage); keeping detection in one place is what makes
//! the "exactly one notification per observable change" invariant hold.
//!
//! # Example
//!
//! The shape generated glue takes (hand-written here):
//!
//! ```
//! use std::sync::Arc;
//! use horizon_trellis_core::bridge::{BridgeHost, CoreObject, UpdateState};
//! use horizon_trellis_core::dispatch::UiExecutor;
//! use horizon_trellis_core::property::PropertyCell;
//! use horizon_trellis_core::signal::Signal;
//!
//! #[derive(Default)]
//! struct CounterCore {
//!     count: i32,
//! }
//!
//! impl CoreObject for CounterCore {
//!     type Bridge = CounterBridge;
//!
//!     fn initialise(&mut self, bridge: &CounterBridge) {
//!         bridge.set_count(self.count);
//!     }
//!
//!     fn handle_update_request(&mut self, bridge: &CounterBridge) {
//!         bridge.set_count(self.count);
//!     }
//! }
//!
//! struct CounterBridge {
//!     host: BridgeHost<CounterCore>,
//!     count: PropertyCell<i32>,
//!     count_changed: Signal<i32>,
//! }
//!
//! impl CounterBridge {
//!     fn new(executor: &UiExecutor) -> Arc<Self> {
//!         let bridge = Arc::new(Self {
//!             host: BridgeHost::new(CounterCore::default(), executor.handle()),
//!             count: PropertyCell::new(0),
//!             count_changed: Signal::new("count_changed"),
//!         });
//!         bridge.host.run_initialise(&bridge);
//!         bridge
//!     }
//!
//!     fn count(&self) -> i32 {
//!         self.host.read(&self.count)
//!     }
//!
//!     fn set_count(&self, value: i32) {
//!         self.host.apply(&self.count, &self.count_changed, value);
//!     }
//! }
//!
//! impl UpdateState for CounterBridge {
//!     fn update_state(&self) {
//!         self.host.update_state(self);
//!     }
//! }
//!
//! let executor = UiExecutor::new();
//! let bridge = CounterBridge::new(&executor);
//! assert_eq!(bridge.count(), 0);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::affinity::ThreadAffinity;
use crate::dispatch::DispatchHandle;
use crate::logging::targets;
use crate::property::PropertyCell;
use crate::signal::Signal;

/// The domain-logic half of a bridged type.
///
/// A core object owns its own storage and behavior; it knows nothing about
/// change detection or signal scheduling. It is exclusively owned by one
/// bridge object for its entire lifetime, and all of its entry points run
/// under that bridge's mutex.
pub trait CoreObject: Send + 'static {
    /// The bridge type that exclusively owns this core.
    type Bridge;

    /// Initialisation hook, run once during bridge construction.
    ///
    /// May push initial property values through the bridge's setters; those
    /// writes land in the cache silently because initialisation has not
    /// completed yet.
    fn initialise(&mut self, bridge: &Self::Bridge) {
        let _ = bridge;
    }

    /// Update-handling entry point.
    ///
    /// Called on the owning thread, under the mutex, whenever an
    /// [`UpdateRequester`](crate::requester::UpdateRequester) fires. This is
    /// where state produced on worker threads is applied: read or mutate
    /// `self`, then push the results through the bridge's setters.
    fn handle_update_request(&mut self, bridge: &Self::Bridge) {
        let _ = bridge;
    }
}

/// Dispatch target for update requests.
///
/// Implemented by every concrete bridge type; the implementation forwards
/// to [`BridgeHost::update_state`] with the bridge itself as context.
pub trait UpdateState: Send + Sync {
    /// Re-synchronize the bridge from its core object.
    fn update_state(&self);
}

/// The runtime half of a bridge object.
///
/// Generated bridge structs embed one `BridgeHost` plus one
/// [`PropertyCell`]/[`Signal`] pair per property, and route every property
/// and invokable access through it.
///
/// # Thread Safety
///
/// The host is `Send + Sync` so bridges can live in `Arc` and hand out weak
/// references, but the property paths ([`read`](Self::read),
/// [`apply`](Self::apply)) are owning-thread-only by contract and the
/// mutex-guarded paths serialize across all threads.
pub struct BridgeHost<C: CoreObject> {
    /// The exclusively-owned core object. Every mutation of core state
    /// happens while this mutex is held.
    core: Mutex<C>,
    /// False from construction until `run_initialise` completes; never
    /// resets to false afterwards.
    initialised: AtomicBool,
    /// The owning thread.
    affinity: ThreadAffinity,
    /// Queue of the owning thread's executor.
    dispatch: DispatchHandle,
}

impl<C: CoreObject> BridgeHost<C> {
    /// Create a host owning `core`, bound to the current thread.
    ///
    /// The core object is created exactly once per bridge and lives exactly
    /// as long as the host.
    pub fn new(core: C, dispatch: DispatchHandle) -> Self {
        Self {
            core: Mutex::new(core),
            initialised: AtomicBool::new(false),
            affinity: ThreadAffinity::current(),
            dispatch,
        }
    }

    /// Run the core's initialisation hook, then mark the bridge
    /// initialised.
    ///
    /// Property writes made by the hook are silent. Must be called exactly
    /// once, on the owning thread, before the bridge is handed to the UI
    /// model.
    pub fn run_initialise(&self, bridge: &C::Bridge) {
        self.affinity
            .debug_assert_owning_thread_with_msg("bridge initialised from a non-owning thread");
        debug_assert!(
            !self.is_initialised(),
            "bridge object initialised more than once"
        );
        {
            let mut core = self.core.lock();
            core.initialise(bridge);
        }
        self.initialised.store(true, Ordering::Release);
        tracing::debug!(target: targets::BRIDGE, "bridge initialised");
    }

    /// Whether initialisation has completed.
    pub fn is_initialised(&self) -> bool {
        self.initialised.load(Ordering::Acquire)
    }

    /// Read a cached property value.
    ///
    /// No side effects, no mutex. Owning thread only: the cache is not
    /// synchronized for cross-thread reads.
    pub fn read<T: Clone>(&self, cell: &PropertyCell<T>) -> T {
        self.affinity
            .debug_assert_owning_thread_with_msg("property read from a non-owning thread");
        cell.get()
    }

    /// Run the setter protocol for one property.
    ///
    /// Before initialisation completes this overwrites the cache and
    /// returns. Afterwards, an equal value is a no-op; a changed value
    /// overwrites the cache and queues `signal` for emission on the owning
    /// thread, FIFO with all other queued work.
    ///
    /// # Panics
    ///
    /// Panics if the change signal cannot be scheduled: the owning
    /// thread's executor must outlive every bridge it serves.
    pub fn apply<T>(&self, cell: &PropertyCell<T>, signal: &Signal<T>, value: T)
    where
        T: Clone + PartialEq + Send + 'static,
    {
        self.affinity
            .debug_assert_owning_thread_with_msg("property written from a non-owning thread");

        if !self.is_initialised() {
            cell.set_silent(value);
            return;
        }

        if cell.set(value.clone()) {
            tracing::trace!(
                target: targets::BRIDGE,
                signal = signal.name(),
                "property changed, queueing notification"
            );
            signal.emit_queued(value, &self.dispatch);
        }
    }

    /// Serialized access to the core object.
    ///
    /// This is the path every invokable takes: lock the mutex, forward to
    /// the core, unlock. The core may borrow the bridge for the duration of
    /// the call only, including calling back into setters or emitting
    /// signals, which never touch the mutex. The mutex is not re-entrant:
    /// core code must not call back into another mutex-guarded entry point.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut core = self.core.lock();
        f(&mut core)
    }

    /// Run the core's update-handling entry point under the mutex.
    ///
    /// Called on the owning thread by the bridge's
    /// [`UpdateState::update_state`] implementation when a queued update
    /// request is executed.
    pub fn update_state(&self, bridge: &C::Bridge) {
        tracing::trace!(target: targets::BRIDGE, "running update request");
        let mut core = self.core.lock();
        core.handle_update_request(bridge);
    }

    /// The dispatch handle of the owning thread's executor.
    pub fn dispatch(&self) -> &DispatchHandle {
        &self.dispatch
    }

    /// The owning thread of this bridge.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Raw access to the core object, bypassing the mutex.
    ///
    /// # Safety
    ///
    /// The caller must guarantee no other thread is executing a
    /// mutex-guarded entry point. Intended for generated glue during
    /// construction, before the bridge is observable, and for advanced
    /// direct-access escape hatches.
    pub unsafe fn core_unchecked(&self) -> &C {
        unsafe { &*self.core.data_ptr() }
    }

    /// Raw mutable access to the core object, bypassing the mutex.
    ///
    /// # Safety
    ///
    /// Same contract as [`core_unchecked`](Self::core_unchecked).
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn core_unchecked_mut(&self) -> &mut C {
        unsafe { &mut *self.core.data_ptr() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::UiExecutor;
    use std::sync::Arc;

    #[derive(Default)]
    struct EchoCore {
        value: i32,
        update_calls: i32,
    }

    impl CoreObject for EchoCore {
        type Bridge = EchoBridge;

        fn initialise(&mut self, bridge: &EchoBridge) {
            self.value = 5;
            bridge.set_value(self.value);
        }

        fn handle_update_request(&mut self, bridge: &EchoBridge) {
            self.update_calls += 1;
            bridge.set_value(self.value);
        }
    }

    struct EchoBridge {
        host: BridgeHost<EchoCore>,
        value: PropertyCell<i32>,
        value_changed: Signal<i32>,
    }

    impl EchoBridge {
        fn new(executor: &UiExecutor) -> Arc<Self> {
            let bridge = Arc::new(Self {
                host: BridgeHost::new(EchoCore::default(), executor.handle()),
                value: PropertyCell::new(0),
                value_changed: Signal::new("value_changed"),
            });
            bridge.host.run_initialise(&bridge);
            bridge
        }

        fn value(&self) -> i32 {
            self.host.read(&self.value)
        }

        fn set_value(&self, value: i32) {
            self.host.apply(&self.value, &self.value_changed, value);
        }
    }

    impl UpdateState for EchoBridge {
        fn update_state(&self) {
            self.host.update_state(self);
        }
    }

    #[test]
    fn test_initialise_is_silent() {
        let executor = UiExecutor::new();
        let fired = Arc::new(Mutex::new(Vec::new()));

        let bridge = EchoBridge::new(&executor);
        let fired_clone = fired.clone();
        bridge.value_changed.connect(move |&v| fired_clone.lock().push(v));

        // The initialise hook stored 5 without a notification.
        assert!(bridge.host.is_initialised());
        assert_eq!(bridge.value(), 5);
        executor.process_pending();
        assert!(fired.lock().is_empty());
    }

    #[test]
    fn test_set_after_init_notifies_once_per_change() {
        let executor = UiExecutor::new();
        let bridge = EchoBridge::new(&executor);
        let fired = Arc::new(Mutex::new(Vec::new()));

        let fired_clone = fired.clone();
        bridge.value_changed.connect(move |&v| fired_clone.lock().push(v));

        bridge.set_value(7);
        bridge.set_value(7);
        bridge.set_value(9);
        executor.process_pending();

        assert_eq!(*fired.lock(), vec![7, 9]);
    }

    #[test]
    fn test_notification_is_queued_not_inline() {
        let executor = UiExecutor::new();
        let bridge = EchoBridge::new(&executor);
        let fired = Arc::new(Mutex::new(0));

        let fired_clone = fired.clone();
        bridge.value_changed.connect(move |_| *fired_clone.lock() += 1);

        bridge.set_value(1);
        assert_eq!(*fired.lock(), 0);
        executor.process_pending();
        assert_eq!(*fired.lock(), 1);
    }

    #[test]
    fn test_update_state_serializes_through_core() {
        let executor = UiExecutor::new();
        let bridge = EchoBridge::new(&executor);

        bridge.host.with_core(|core| core.value = 42);
        bridge.update_state();
        executor.process_pending();

        assert_eq!(bridge.value(), 42);
        assert_eq!(bridge.host.with_core(|core| core.update_calls), 1);
    }

    #[test]
    fn test_core_unchecked_reads_core_storage() {
        let executor = UiExecutor::new();
        let bridge = EchoBridge::new(&executor);

        // SAFETY: no other thread is touching the bridge in this test.
        unsafe {
            assert_eq!(bridge.host.core_unchecked().value, 5);
            bridge.host.core_unchecked_mut().value = 11;
            assert_eq!(bridge.host.core_unchecked().value, 11);
        }
    }
}
