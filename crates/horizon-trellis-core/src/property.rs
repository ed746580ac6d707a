//! Cached property cells for bridge objects.
//!
//! A bridge object mirrors each of its core object's properties in a
//! [`PropertyCell<T>`]. The cell is the UI-visible value: getters read it
//! directly, and the bridge's setter protocol decides when a write counts
//! as a change worth signalling.
//!
//! Change detection is by value equality ([`PartialEq`]), not identity:
//! [`set`](PropertyCell::set) reports `false` when the incoming value equals
//! the cached one, and the bridge emits no signal in that case.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::property::PropertyCell;
//!
//! let cell = PropertyCell::new(0);
//!
//! // During initialisation: overwrite without a change report.
//! cell.set_silent(5);
//! assert_eq!(cell.get(), 5);
//!
//! // Steady state: equal values are a no-op...
//! assert!(!cell.set(5));
//! // ...different values report a change.
//! assert!(cell.set(7));
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A cached property value with change detection.
///
/// The cell is lock-backed so bridge objects holding one stay `Sync` and can
/// be shared through `Arc` for weak back-references, but the bridge contract
/// only reads and writes it on the owning thread.
pub struct PropertyCell<T> {
    value: RwLock<T>,
}

impl<T: Clone> PropertyCell<T> {
    /// Create a cell with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider [`with`](Self::with)
    /// instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrite the value without a change report.
    ///
    /// This is the pre-initialisation path: while a bridge object is still
    /// constructing, setters write the cache directly and nothing observes
    /// the change.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> PropertyCell<T> {
    /// Store the value, returning `true` if it differed from the cache.
    ///
    /// When this returns `true` the caller is responsible for scheduling the
    /// property's change signal; when it returns `false` the cache is left
    /// untouched and no notification is due.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Store the value, returning the previous one if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            let old = std::mem::replace(&mut *current, value);
            Some(old)
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for PropertyCell<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for PropertyCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for PropertyCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyCell")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_basic() {
        let cell = PropertyCell::new(42);
        assert_eq!(cell.get(), 42);
    }

    #[test]
    fn test_set_detects_change() {
        let cell = PropertyCell::new(10);

        assert!(!cell.set(10));
        assert_eq!(cell.get(), 10);

        assert!(cell.set(20));
        assert_eq!(cell.get(), 20);
    }

    #[test]
    fn test_set_silent_never_reports() {
        let cell = PropertyCell::new(100);
        cell.set_silent(200);
        assert_eq!(cell.get(), 200);
    }

    #[test]
    fn test_replace() {
        let cell = PropertyCell::new("hello".to_string());

        assert!(cell.replace("hello".to_string()).is_none());

        let old = cell.replace("world".to_string());
        assert_eq!(old, Some("hello".to_string()));
        assert_eq!(cell.get(), "world");
    }

    #[test]
    fn test_with_closure() {
        let cell = PropertyCell::new(vec![1, 2, 3]);
        let sum: i32 = cell.with(|v| v.iter().sum());
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_default() {
        let cell: PropertyCell<i32> = PropertyCell::default();
        assert_eq!(cell.get(), 0);
    }
}
