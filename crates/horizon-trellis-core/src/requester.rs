//! Cross-thread update requests.
//!
//! An [`UpdateRequester`] is the handle a core object hands to its worker
//! threads. Calling [`request_update`](UpdateRequester::request_update)
//! from any thread schedules the bridge's
//! [`update_state`](crate::bridge::UpdateState::update_state) on the owning
//! thread, where the core's update handler runs under the mutex and pushes
//! new state into the property cache.
//!
//! The requester never owns its bridge. It holds a weak link that is only
//! resolved on the owning thread, at the moment the queued task actually
//! runs, never at enqueue time. Because bridge destruction also happens on
//! the owning thread, a request racing with destruction either runs in full
//! before teardown or observes the dead link and does nothing; there is no
//! window where it executes against a half-destroyed object.
//!
//! # Example
//!
//! ```ignore
//! // Inside an invokable: hand a requester to a worker thread.
//! let requester = UpdateRequester::for_bridge(&bridge, dispatch.clone());
//! std::thread::spawn(move || {
//!     // ... produce new state ...
//!     requester.request_update();
//! });
//! ```

use std::sync::{Arc, Weak};

use crate::bridge::UpdateState;
use crate::dispatch::DispatchHandle;
use crate::logging::targets;

/// The stable method-name token every requester dispatches to.
const UPDATE_METHOD: &str = "update_state";

/// A shareable, weakly-bound handle for requesting bridge updates from any
/// thread.
///
/// Clone freely; every clone targets the same bridge. The handle is in one
/// of two states:
///
/// - **Bound**: the bridge is alive; requests enqueue its `update_state`.
/// - **Detached**: the bridge has been destroyed; requests are silent
///   no-ops, never errors.
#[derive(Clone)]
pub struct UpdateRequester {
    /// Weak link to the bridge, resolved only when the queued task runs.
    target: Weak<dyn UpdateState>,
    /// Queue of the bridge's owning thread.
    dispatch: DispatchHandle,
    /// Stable dispatch-target name, for diagnostics.
    method: &'static str,
}

impl UpdateRequester {
    /// Create a requester from a weak bridge link and the owning thread's
    /// dispatch handle.
    pub fn new(target: Weak<dyn UpdateState>, dispatch: DispatchHandle) -> Self {
        Self {
            target,
            dispatch,
            method: UPDATE_METHOD,
        }
    }

    /// Create a requester bound to `bridge`.
    pub fn for_bridge<B>(bridge: &Arc<B>, dispatch: DispatchHandle) -> Self
    where
        B: UpdateState + 'static,
    {
        let weak: Weak<B> = Arc::downgrade(bridge);
        Self::new(weak, dispatch)
    }

    /// The stable name of the method this requester dispatches to.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Whether the target bridge has been destroyed.
    ///
    /// A detached requester is harmless to keep and to call; this is
    /// informational only.
    pub fn is_detached(&self) -> bool {
        self.target.strong_count() == 0
    }

    /// Ask the owning thread to re-synchronize the bridge from its core.
    ///
    /// Fire-and-forget: returns immediately, and the caller gets no
    /// completion notification. The update runs on the owning thread in
    /// FIFO order with all other work queued for that executor; `n` calls
    /// produce `n` executions, never coalesced.
    ///
    /// If the bridge has been destroyed this is a silent no-op.
    ///
    /// # Panics
    ///
    /// Panics if the executor is gone while the bridge is still alive:
    /// the owning thread must be able to accept queued work for as long as
    /// bridges it serves exist. An executor and bridge torn down together
    /// (normal shutdown) never trips this.
    pub fn request_update(&self) {
        if self.is_detached() {
            tracing::trace!(
                target: targets::REQUESTER,
                method = self.method,
                "request against detached requester ignored"
            );
            return;
        }

        let target = self.target.clone();
        let posted = self.dispatch.post(move || {
            // Resolve the weak link only now, on the owning thread. A
            // bridge destroyed after enqueue is observed as dead here.
            if let Some(bridge) = target.upgrade() {
                bridge.update_state();
            }
        });

        if posted.is_err() {
            if self.target.strong_count() == 0 {
                // Bridge and executor went away together: shutdown path.
                return;
            }
            panic!(
                "failed to schedule '{}': the owning thread's executor has shut \
                 down while the bridge object is still alive",
                self.method
            );
        }
    }
}

static_assertions::assert_impl_all!(UpdateRequester: Send, Sync);
