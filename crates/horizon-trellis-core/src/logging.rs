//! Logging facilities for Horizon Trellis.
//!
//! Horizon Trellis uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Each subsystem logs under its own target so traces can be filtered per
//! concern, e.g. `RUST_LOG=horizon_trellis_core::dispatch=trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Owning-thread executor and dispatch queue.
    pub const DISPATCH: &str = "horizon_trellis_core::dispatch";
    /// Signal connection and emission.
    pub const SIGNAL: &str = "horizon_trellis_core::signal";
    /// Bridge object lifecycle and property protocol.
    pub const BRIDGE: &str = "horizon_trellis_core::bridge";
    /// Update requester activity.
    pub const REQUESTER: &str = "horizon_trellis_core::requester";
    /// Bridge type registry.
    pub const REGISTRY: &str = "horizon_trellis_core::registry";
}
