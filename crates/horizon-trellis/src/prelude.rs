//! Prelude module for Horizon Trellis.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use horizon_trellis::prelude::*;
//! ```
//!
//! This provides access to:
//! - Owning-thread dispatch (`UiExecutor`, `DispatchHandle`)
//! - Bridge protocol (`BridgeHost`, `CoreObject`, `UpdateState`)
//! - Properties and signals (`PropertyCell`, `Signal`)
//! - Cross-thread updates (`UpdateRequester`)
//! - Value conversion (`Variant`, `Opaque`, `UiValue`)
//! - Type registration (`BridgeRegistry`, `BridgeDescriptor`)

// ============================================================================
// Owning-Thread Dispatch
// ============================================================================

pub use crate::dispatch::{DispatchHandle, UiExecutor};

// ============================================================================
// Bridge Protocol
// ============================================================================

pub use crate::bridge::{BridgeHost, CoreObject, UpdateState};
pub use crate::requester::UpdateRequester;

// ============================================================================
// Properties and Signals
// ============================================================================

pub use crate::property::PropertyCell;
pub use crate::signal::{ConnectionId, Signal, SignalRef};

// ============================================================================
// Value Conversion
// ============================================================================

pub use crate::value::{Opaque, UiValue, Variant, VariantKind};

// ============================================================================
// Type Registration
// ============================================================================

pub use crate::registry::{AnyBridge, BridgeDescriptor, BridgeRegistry};

// ============================================================================
// Errors
// ============================================================================

pub use crate::{Result, TrellisError};
