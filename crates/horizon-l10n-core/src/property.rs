//! Change-detecting properties.
//!
//! A [`Property<T>`] wraps a value and reports whether a write actually
//! changed it. Pair it with a [`Signal`](crate::Signal) and emit only when
//! [`Property::set`] returns `true`:
//!
//! ```
//! use horizon_l10n_core::{Property, Signal};
//!
//! struct Currency {
//!     code: Property<String>,
//!     code_changed: Signal<String>,
//! }
//!
//! impl Currency {
//!     fn set_code(&self, code: &str) {
//!         if self.code.set(code.to_string()) {
//!             self.code_changed.emit(code.to_string());
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// whenever `T` is.
///
/// ```
/// use horizon_l10n_core::Property;
///
/// let prop = Property::new(42);
/// assert!(!prop.set(42));
/// assert!(prop.set(100));
/// assert_eq!(prop.get(), 100);
/// ```
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

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A read-only view of a property.
///
/// Useful for exposing state publicly while keeping the setter private.
pub struct ReadOnlyProperty<'a, T> {
    inner: &'a Property<T>,
}

impl<'a, T: Clone> ReadOnlyProperty<'a, T> {
    /// Create a read-only view of a property.
    pub fn new(property: &'a Property<T>) -> Self {
        Self { inner: property }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_change() {
        let prop = Property::new("en-US".to_string());
        assert!(!prop.set("en-US".to_string()));
        assert!(prop.set("fr-FR".to_string()));
        assert_eq!(prop.get(), "fr-FR");
    }

    #[test]
    fn test_replace_returns_previous() {
        let prop = Property::new(1);
        assert_eq!(prop.replace(1), None);
        assert_eq!(prop.replace(2), Some(1));
        assert_eq!(prop.get(), 2);
    }

    #[test]
    fn test_with_borrows_value() {
        let prop = Property::new(vec![1, 2]);
        assert_eq!(prop.with(|v| v.len()), 2);
    }

    #[test]
    fn test_read_only_view() {
        let prop = Property::new(String::from("EUR"));
        let view = ReadOnlyProperty::new(&prop);
        assert_eq!(view.get(), "EUR");
        prop.set("USD".to_string());
        assert_eq!(view.with(|s| s.clone()), "USD");
    }
}
