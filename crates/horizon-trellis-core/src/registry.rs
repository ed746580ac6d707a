//! Bridge type registration.
//!
//! The UI model instantiates bridge types by name. Rather than each
//! generated type registering itself through global mutable state at
//! startup, the generator emits one [`BridgeDescriptor`] per type and hands
//! the collected [`BridgeRegistry`] to the runtime when it starts. The
//! registry is immutable after construction: there is no way to register
//! a type behind the runtime's back.
//!
//! # Example
//!
//! ```ignore
//! let registry = BridgeRegistry::from_descriptors([
//!     BridgeDescriptor::new("Counter", |dispatch| CounterBridge::create(dispatch)),
//!     BridgeDescriptor::new("Playlist", |dispatch| PlaylistBridge::create(dispatch)),
//! ])?;
//!
//! let bridge = registry.construct("Counter", &executor.handle())?;
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::bridge::UpdateState;
use crate::dispatch::DispatchHandle;
use crate::logging::targets;

/// A type-erased view of a constructed bridge object.
///
/// The UI model works with bridges through this trait; glue code downcasts
/// via [`as_any`](Self::as_any) when it needs the concrete type.
pub trait AnyBridge: UpdateState {
    /// The registered name of this bridge type.
    fn type_name(&self) -> &'static str;

    /// Downcasting access to the concrete bridge.
    fn as_any(&self) -> &dyn Any;
}

/// Constructor signature for a registered bridge type.
type BridgeConstructor = dyn Fn(&DispatchHandle) -> Arc<dyn AnyBridge> + Send + Sync;

/// One entry of the registration table: a type name plus the constructor
/// the generator emitted for it.
pub struct BridgeDescriptor {
    type_name: &'static str,
    construct: Box<BridgeConstructor>,
}

impl BridgeDescriptor {
    /// Describe a bridge type.
    ///
    /// `construct` must create the bridge on the calling thread (the owning
    /// thread) and run its initialisation before returning.
    pub fn new<F>(type_name: &'static str, construct: F) -> Self
    where
        F: Fn(&DispatchHandle) -> Arc<dyn AnyBridge> + Send + Sync + 'static,
    {
        Self {
            type_name,
            construct: Box::new(construct),
        }
    }

    /// The name this type registers under.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for BridgeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeDescriptor")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Registry-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two descriptors were registered under the same name.
    Duplicate {
        /// The name registered twice.
        type_name: &'static str,
    },
    /// No descriptor is registered under the requested name.
    Unknown {
        /// The name that was looked up.
        type_name: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { type_name } => {
                write!(f, "Bridge type '{type_name}' registered more than once")
            }
            Self::Unknown { type_name } => {
                write!(f, "Bridge type '{type_name}' is not registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// The registration table handed to the runtime at start-up.
#[derive(Debug, Default)]
pub struct BridgeRegistry {
    descriptors: HashMap<&'static str, BridgeDescriptor>,
    /// Registration order, for stable iteration.
    order: Vec<&'static str>,
}

impl BridgeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from generator-emitted descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if two descriptors share a
    /// name.
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = BridgeDescriptor>,
    {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Add one descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is already taken.
    pub fn register(&mut self, descriptor: BridgeDescriptor) -> Result<(), RegistryError> {
        let name = descriptor.type_name;
        if self.descriptors.contains_key(name) {
            return Err(RegistryError::Duplicate { type_name: name });
        }
        tracing::debug!(target: targets::REGISTRY, type_name = name, "bridge type registered");
        self.descriptors.insert(name, descriptor);
        self.order.push(name);
        Ok(())
    }

    /// Check whether a type name is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.descriptors.contains_key(type_name)
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Registered type names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Construct a bridge by type name.
    ///
    /// Must be called on the owning thread; the descriptor's constructor
    /// builds and initialises the bridge before returning it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] for an unregistered name.
    pub fn construct(
        &self,
        type_name: &str,
        dispatch: &DispatchHandle,
    ) -> Result<Arc<dyn AnyBridge>, RegistryError> {
        let descriptor = self
            .descriptors
            .get(type_name)
            .ok_or_else(|| RegistryError::Unknown {
                type_name: type_name.to_owned(),
            })?;
        Ok((descriptor.construct)(dispatch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::UiExecutor;
    use parking_lot::Mutex;

    struct NullBridge {
        runs: Mutex<u32>,
    }

    impl UpdateState for NullBridge {
        fn update_state(&self) {
            *self.runs.lock() += 1;
        }
    }

    impl AnyBridge for NullBridge {
        fn type_name(&self) -> &'static str {
            "Null"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn null_descriptor() -> BridgeDescriptor {
        BridgeDescriptor::new("Null", |_dispatch| {
            Arc::new(NullBridge { runs: Mutex::new(0) })
        })
    }

    #[test]
    fn test_register_and_construct() {
        let executor = UiExecutor::new();
        let registry = BridgeRegistry::from_descriptors([null_descriptor()]).unwrap();

        assert!(registry.contains("Null"));
        assert_eq!(registry.len(), 1);

        let bridge = registry.construct("Null", &executor.handle()).unwrap();
        assert_eq!(bridge.type_name(), "Null");
        assert!(bridge.as_any().downcast_ref::<NullBridge>().is_some());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = BridgeRegistry::from_descriptors([null_descriptor(), null_descriptor()]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::Duplicate { type_name: "Null" }
        );
    }

    #[test]
    fn test_unknown_name() {
        let executor = UiExecutor::new();
        let registry = BridgeRegistry::new();

        let err = match registry.construct("Missing", &executor.handle()) {
            Ok(_) => panic!("expected construct to fail for unknown name"),
            Err(e) => e,
        };
        assert_eq!(
            err,
            RegistryError::Unknown {
                type_name: "Missing".to_string(),
            }
        );
    }

    #[test]
    fn test_names_in_registration_order() {
        let mut registry = BridgeRegistry::new();
        registry
            .register(BridgeDescriptor::new("B", |_| {
                Arc::new(NullBridge { runs: Mutex::new(0) })
            }))
            .unwrap();
        registry
            .register(BridgeDescriptor::new("A", |_| {
                Arc::new(NullBridge { runs: Mutex::new(0) })
            }))
            .unwrap();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
