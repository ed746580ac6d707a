//! Horizon Trellis - a runtime bridging opaque core objects to reactive UI
//! object models.
//!
//! This is the main umbrella crate that re-exports all public APIs.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::prelude::*;
//!
//! // The owning thread runs the executor; bridge objects live on it.
//! let executor = UiExecutor::new();
//! let handle = executor.handle();
//!
//! handle.post(|| println!("runs on the owning thread")).unwrap();
//! executor.process_pending();
//! ```

pub use horizon_trellis_core::*;

pub mod prelude;
