//! Core systems for Horizon Trellis.
//!
//! This crate provides the runtime that bridges opaque core objects (domain
//! logic, possibly driven from worker threads) to a reactive UI object
//! model living on a single owning thread:
//!
//! - **Dispatch**: FIFO task scheduling onto the owning thread from any thread
//! - **Bridge Protocol**: property caching, change detection, initialisation
//!   phase and the single core mutex
//! - **Signals**: named change notifications with immediate and queued emission
//! - **Update Requesters**: weakly-bound cross-thread resync handles
//! - **Value Conversion**: primitives, opaque handles and the generic variant
//! - **Registry**: the explicit bridge-type table handed to runtime start-up
//!
//! # The protocol in one example
//!
//! A bridged counter whose core is driven from a worker thread:
//!
//! ```
//! use std::sync::Arc;
//! use horizon_trellis_core::{BridgeHost, CoreObject, UpdateState};
//! use horizon_trellis_core::{PropertyCell, Signal, UiExecutor, UpdateRequester};
//!
//! #[derive(Default)]
//! struct CounterCore {
//!     count: i32,
//! }
//!
//! impl CoreObject for CounterCore {
//!     type Bridge = CounterBridge;
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
//!
//!     fn update_requester(bridge: &Arc<Self>) -> UpdateRequester {
//!         UpdateRequester::for_bridge(bridge, bridge.host.dispatch().clone())
//!     }
//! }
//!
//! impl UpdateState for CounterBridge {
//!     fn update_state(&self) {
//!         self.host.update_state(self);
//!     }
//! }
//!
//! // Owning thread: construct and observe.
//! let executor = UiExecutor::new();
//! let bridge = CounterBridge::new(&executor);
//! bridge.count_changed.connect(|&count| println!("count: {count}"));
//!
//! // Worker thread: mutate the core, then request a resync.
//! let requester = CounterBridge::update_requester(&bridge);
//! let worker_bridge = bridge.clone();
//! std::thread::spawn(move || {
//!     worker_bridge.host.with_core(|core| core.count = 42);
//!     requester.request_update();
//! })
//! .join()
//! .unwrap();
//!
//! // Owning thread: the update and the change signal arrive in FIFO order.
//! executor.process_pending();
//! assert_eq!(bridge.count(), 42);
//! ```

pub mod affinity;
pub mod bridge;
pub mod dispatch;
mod error;
pub mod logging;
pub mod property;
pub mod registry;
pub mod requester;
pub mod signal;
pub mod value;

pub use affinity::ThreadAffinity;
pub use bridge::{BridgeHost, CoreObject, UpdateState};
pub use dispatch::{DispatchHandle, UiExecutor};
pub use error::{DispatchError, Result, TrellisError};
pub use property::PropertyCell;
pub use registry::{AnyBridge, BridgeDescriptor, BridgeRegistry, RegistryError};
pub use requester::UpdateRequester;
pub use signal::{ConnectionId, Signal, SignalRef};
pub use value::{Opaque, UiValue, ValueError, Variant, VariantKind};
