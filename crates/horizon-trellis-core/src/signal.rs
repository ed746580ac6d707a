//! Signals for bridge objects.
//!
//! A [`Signal`] is a named notification primitive: bridge objects expose one
//! per property (`count_changed`, `text_changed`, …) plus any standalone
//! signals their core declares. Slots (closures) connect to a signal and are
//! invoked each time it is emitted.
//!
//! # Emission paths
//!
//! - [`emit`](Signal::emit) invokes slots immediately on the calling thread.
//!   Bridge code uses this on the owning thread only, for re-entrant
//!   emission from inside an invokable.
//! - [`emit_queued`](Signal::emit_queued) schedules the emission through the
//!   owning thread's dispatch queue. This is the path the property protocol
//!   uses: the signal fires later, on the owning thread, in FIFO order with
//!   all other queued work.
//!
//! Queued emission captures a [`SignalRef`], a weak handle that is only
//! upgraded at the moment the task runs on the owning thread. If the bridge
//! (and with it the signal) was destroyed in the meantime, the emission is
//! dropped silently, never delivered against a dead object.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::signal::Signal;
//!
//! let count_changed = Signal::<i32>::new("count_changed");
//!
//! let id = count_changed.connect(|&count| {
//!     println!("count is now {count}");
//! });
//!
//! count_changed.emit(3);
//! count_changed.disconnect(id);
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::dispatch::DispatchHandle;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`]
    /// to remove that slot.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

struct SignalInner<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
}

/// A named, type-safe signal.
///
/// Cloning a `Signal` produces another handle to the same connection table;
/// bridge objects hand out clones where glue code needs to schedule
/// emission. Use [`downgrade`](Self::downgrade) for handles that must not
/// keep the signal alive.
pub struct Signal<Args> {
    /// Stable name token, as declared to the UI model.
    name: &'static str,
    inner: Arc<SignalInner<Args>>,
}

impl<Args> Clone for Signal<Args> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: self.inner.clone(),
        }
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// Create a signal with the given stable name and no connections.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(SignalInner {
                connections: Mutex::new(SlotMap::with_key()),
            }),
        }
    }

    /// The stable name this signal was declared under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Connect a slot to this signal.
    ///
    /// Returns a [`ConnectionId`] for later disconnection.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.inner.connections.lock().insert(Connection {
            slot: Arc::new(slot),
        })
    }

    /// Disconnect a slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.inner.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots.
    pub fn disconnect_all(&self) {
        self.inner.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.inner.connections.lock().len()
    }

    /// Emit the signal immediately, invoking all connected slots on the
    /// calling thread.
    ///
    /// Slots are invoked in connection order. The connection table is not
    /// locked during invocation, so a slot may connect or disconnect
    /// without deadlocking.
    pub fn emit(&self, args: Args) {
        let slots: Vec<_> = self
            .inner
            .connections
            .lock()
            .iter()
            .map(|(_, conn)| conn.slot.clone())
            .collect();
        tracing::trace!(
            target: targets::SIGNAL,
            signal = self.name,
            slots = slots.len(),
            "emitting signal"
        );
        for slot in slots {
            slot(&args);
        }
    }

    /// Schedule emission on the owning thread via the dispatch queue.
    ///
    /// The emission runs in FIFO order with every other task posted to the
    /// same executor. The signal is held weakly until the task actually
    /// runs; if the owning bridge was destroyed first, nothing is
    /// delivered.
    ///
    /// # Panics
    ///
    /// Panics if the executor has shut down. A live bridge object must
    /// always be able to schedule its own signals; a dead queue under a
    /// live bridge means UI-visible state changes would be silently
    /// dropped, which is an unrecoverable contract violation.
    pub fn emit_queued(&self, args: Args, dispatch: &DispatchHandle) {
        let weak = self.downgrade();
        let posted = dispatch.post(move || {
            if let Some(signal) = weak.upgrade() {
                signal.emit(args);
            }
        });
        if posted.is_err() {
            panic!(
                "failed to schedule emission of signal '{}': the owning thread's \
                 executor has shut down while the bridge object is still alive",
                self.name
            );
        }
    }

    /// Create a weak handle to this signal.
    pub fn downgrade(&self) -> SignalRef<Args> {
        SignalRef {
            name: self.name,
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// A weak handle to a [`Signal`].
///
/// Upgrading yields the signal only while some strong handle (normally the
/// owning bridge object) is still alive.
pub struct SignalRef<Args> {
    name: &'static str,
    inner: Weak<SignalInner<Args>>,
}

impl<Args> Clone for SignalRef<Args> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: self.inner.clone(),
        }
    }
}

impl<Args: Send + 'static> SignalRef<Args> {
    /// The stable name of the referenced signal.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Attempt to recover a strong handle.
    pub fn upgrade(&self) -> Option<Signal<Args>> {
        self.inner.upgrade().map(|inner| Signal {
            name: self.name,
            inner,
        })
    }
}
