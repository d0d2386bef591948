//! Property system for Horizon Select.
//!
//! Properties hold the shared values of a widget. Setting a property reports
//! whether the value changed, so the owner can emit the matching signal only
//! on real changes.
//!
//! # Property Types
//!
//! - **Property<T>**: A value with change detection
//! - **VersionedProperty<T>**: A property whose every change bumps a counter,
//!   used for snapshots that consumers poll
//!
//! # Example
//!
//! ```
//! use horizon_select_core::{Property, Signal};
//!
//! struct Toggle {
//!     open: Property<bool>,
//!     open_changed: Signal<bool>,
//! }
//!
//! impl Toggle {
//!     fn set_open(&self, open: bool) {
//!         if self.open.set(open) {
//!             self.open_changed.emit(open);
//!         }
//!     }
//! }
//!
//! let toggle = Toggle { open: Property::new(false), open_changed: Signal::new() };
//! toggle.set_open(true);
//! assert!(toggle.open.get());
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. `set()`
/// compares the new value with the current one and returns whether the value
/// actually changed.
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// when `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()` instead.
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

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A value paired with a monotonically increasing version.
///
/// The version starts at 0 and is bumped by every `set()` that changes the
/// value. Readers compare versions to tell whether a snapshot is stale.
pub struct VersionedProperty<T> {
    inner: RwLock<(T, u64)>,
}

impl<T: Clone> VersionedProperty<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new((value, 0)),
        }
    }

    /// Get the current value together with its version.
    pub fn snapshot(&self) -> (T, u64) {
        self.inner.read().clone()
    }
}

impl<T: Clone + PartialEq> VersionedProperty<T> {
    /// Set the value, bumping the version and returning `true` if it changed.
    pub fn set(&self, value: T) -> bool {
        let mut inner = self.inner.write();
        if inner.0 != value {
            inner.0 = value;
            inner.1 += 1;
            true
        } else {
            false
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for VersionedProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (value, version) = self.snapshot();
        f.debug_struct("VersionedProperty")
            .field("value", &value)
            .field("version", &version)
            .finish()
    }
}
