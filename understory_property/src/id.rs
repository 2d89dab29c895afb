// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property handles.
//!
//! A registered property is identified by a dense [`PropertyId`]. The id is the
//! lookup key used by every later stage; the string name is only an entry point
//! into the [`PropertyRegistry`](crate::PropertyRegistry).
//!
//! [`Property<T>`] adds the value type at compile time so that typed reads never
//! need a runtime type check at the call site.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A dense runtime property identifier.
///
/// Ids are handed out in registration order starting at zero, so they double
/// as indices into per-element value tables.
///
/// ```rust
/// use understory_property::PropertyId;
///
/// let id = PropertyId::new(7);
/// assert_eq!(id.index(), 7);
/// assert_eq!(id.slot(), 7_usize);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u16);

impl PropertyId {
    /// Creates a property id from a raw index.
    ///
    /// Normally obtained from [`PropertyRegistry::register`](crate::PropertyRegistry::register).
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Returns the index as a `usize`, for indexing dense per-element tables.
    #[must_use]
    #[inline]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A typed property handle.
///
/// `Property<T>` is a [`PropertyId`] carrying the property's value type. It is
/// `Copy` for every `T` and the same size as the id.
///
/// ```rust
/// use understory_property::{Property, PropertyMetadataBuilder, PropertyRegistry};
///
/// let mut registry = PropertyRegistry::new();
/// let opacity: Property<f32> =
///     registry.register("opacity", PropertyMetadataBuilder::new(1.0_f32).build());
///
/// assert_eq!(registry.name(opacity.id()), Some("opacity"));
/// ```
pub struct Property<T> {
    id: PropertyId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Wraps an id with a value type.
    ///
    /// The id must have been registered with the same `T`; typed reads through a
    /// mismatched handle fail their downcast.
    #[must_use]
    #[inline]
    pub const fn from_id(id: PropertyId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the untyped id.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }
}

impl<T> Copy for Property<T> {}

impl<T> Clone for Property<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Property<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Property<T> {}

impl<T> Hash for Property<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> From<Property<T>> for PropertyId {
    #[inline]
    fn from(property: Property<T>) -> Self {
        property.id
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn ids_compare_by_index() {
        assert_eq!(PropertyId::new(3), PropertyId::new(3));
        assert!(PropertyId::new(2) < PropertyId::new(3));
        assert_eq!(PropertyId::new(3).slot(), 3);
    }

    #[test]
    fn id_formatting() {
        assert_eq!(format!("{:?}", PropertyId::new(4)), "PropertyId(4)");
        assert_eq!(format!("{}", PropertyId::new(4)), "#4");
    }

    #[test]
    fn typed_handle_converts_to_id() {
        let opacity: Property<f32> = Property::from_id(PropertyId::new(9));
        let id: PropertyId = opacity.into();
        assert_eq!(id, PropertyId::new(9));
    }

    #[test]
    fn typed_handles_are_id_sized() {
        use core::mem::size_of;
        assert_eq!(size_of::<Property<String>>(), size_of::<PropertyId>());
    }
}
