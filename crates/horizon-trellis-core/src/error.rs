//! Error types for Horizon Trellis.

use std::fmt;

use crate::registry::RegistryError;
use crate::value::ValueError;

/// The main error type for Horizon Trellis operations.
#[derive(Debug)]
pub enum TrellisError {
    /// Dispatch-related error.
    Dispatch(DispatchError),
    /// Registry-related error.
    Registry(RegistryError),
    /// Value conversion error.
    Value(ValueError),
}

impl fmt::Display for TrellisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatch(err) => write!(f, "Dispatch error: {err}"),
            Self::Registry(err) => write!(f, "Registry error: {err}"),
            Self::Value(err) => write!(f, "Value error: {err}"),
        }
    }
}

impl std::error::Error for TrellisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dispatch(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Value(err) => Some(err),
        }
    }
}

/// Dispatch-specific errors.
///
/// Note that most dispatch failures are not represented here: a failure to
/// schedule work for a live bridge object violates the owning-thread
/// liveness contract and panics instead of returning an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The owning thread's executor has shut down; the task was not queued.
    LoopShutDown,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoopShutDown => write!(f, "The owning thread's executor has shut down"),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<DispatchError> for TrellisError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

impl From<RegistryError> for TrellisError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<ValueError> for TrellisError {
    fn from(err: ValueError) -> Self {
        Self::Value(err)
    }
}

/// A specialized Result type for Horizon Trellis operations.
pub type Result<T> = std::result::Result<T, TrellisError>;
