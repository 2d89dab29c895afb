// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comma-separated value lists and CSS-style cycling.
//!
//! Properties such as `background-image` or `transition-duration` hold a list
//! of items. Co-varying lists are aligned to the item count of a primary list,
//! and shorter lists repeat:
//!
//! ```rust
//! use understory_property::{ValueList, iteration_count};
//!
//! let images = ValueList::new(vec!["a", "b", "c"]);
//! let positions = ValueList::new(vec![0, 50]);
//!
//! let count = iteration_count(images.len());
//! let aligned: Vec<_> = (0..count).map(|i| *positions.cycled(i).unwrap()).collect();
//! assert_eq!(aligned, [0, 50, 0]);
//! ```
//!
//! Lists share their storage, so cloning is a reference-count bump and
//! [`ValueList::ptr_eq`] lets consumers skip rebuilding unchanged visuals.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use crate::error::ConversionError;
use crate::raw::{FromRaw, RawValue};
use crate::value::{Interpolate, snap};

/// An immutable, shared, ordered list of property items.
pub struct ValueList<T> {
    items: Arc<[T]>,
}

impl<T> ValueList<T> {
    /// Creates a list from items.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }

    /// Creates a one-item list.
    #[must_use]
    pub fn single(item: T) -> Self {
        Self {
            items: Arc::from([item]),
        }
    }

    /// Returns the items.
    #[must_use]
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns item `index mod len`, or `None` for an empty list.
    #[must_use]
    #[inline]
    pub fn cycled(&self, index: usize) -> Option<&T> {
        if self.items.is_empty() {
            None
        } else {
            Some(&self.items[index % self.items.len()])
        }
    }

    /// Like [`cycled`](Self::cycled), treating an empty list as `[fallback]`.
    #[must_use]
    #[inline]
    pub fn cycled_or<'a>(&'a self, index: usize, fallback: &'a T) -> &'a T {
        self.cycled(index).unwrap_or(fallback)
    }

    /// Returns `true` if both lists share the same storage.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

/// The number of iterations driven by a primary list of `primary_len` items.
///
/// A list declared with zero items still yields one iteration (its default).
#[must_use]
#[inline]
pub fn iteration_count(primary_len: usize) -> usize {
    primary_len.max(1)
}

impl<T> Deref for ValueList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> Clone for ValueList<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: PartialEq> PartialEq for ValueList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.items[..] == other.items[..]
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> FromIterator<T> for ValueList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: Interpolate> Interpolate for ValueList<T> {
    /// Equal-length lists blend item by item; otherwise the list snaps.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        if self.len() != to.len() {
            return snap(self, to, t);
        }
        self.iter()
            .zip(to.iter())
            .map(|(a, b)| a.interpolate(b, t))
            .collect()
    }
}

/// Converts a comma list item by item.
///
/// A list with zero items is rejected with [`ConversionError::Empty`], so the
/// cascade treats it as unset. A malformed item invalidates the whole list.
pub fn parse_list<T>(
    raw: &RawValue,
    item: impl Fn(&RawValue) -> Result<T, ConversionError>,
) -> Result<ValueList<T>, ConversionError> {
    let items = raw.list_items();
    if items.is_empty() {
        return Err(ConversionError::Empty);
    }
    items
        .iter()
        .map(item)
        .collect::<Result<Vec<_>, _>>()
        .map(ValueList::new)
}

impl<T: FromRaw> FromRaw for ValueList<T> {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        parse_list(raw, T::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn cycling_wraps_shorter_lists() {
        let positions = ValueList::new(vec![10, 20]);
        assert_eq!(positions.cycled(0), Some(&10));
        assert_eq!(positions.cycled(1), Some(&20));
        assert_eq!(positions.cycled(2), Some(&10));
        assert_eq!(positions.cycled(5), Some(&20));
    }

    #[test]
    fn empty_lists_fall_back() {
        let empty: ValueList<i32> = ValueList::new(vec![]);
        assert_eq!(empty.cycled(3), None);
        assert_eq!(*empty.cycled_or(3, &7), 7);
        assert_eq!(iteration_count(0), 1);
        assert_eq!(iteration_count(3), 3);
    }

    #[test]
    fn clones_share_storage() {
        let a = ValueList::new(vec![1.0_f32, 2.0]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));

        let c = ValueList::new(vec![1.0_f32, 2.0]);
        assert!(!a.ptr_eq(&c));
        assert_eq!(a, c);
    }

    #[test]
    fn equal_length_lists_blend() {
        let a = ValueList::new(vec![0.0_f32, 10.0]);
        let b = ValueList::new(vec![10.0_f32, 30.0]);
        assert_eq!(a.interpolate(&b, 0.5).as_slice(), &[5.0, 20.0]);

        let short = ValueList::single(1.0_f32);
        assert_eq!(a.interpolate(&short, 0.5), a);
        assert_eq!(a.interpolate(&short, 1.0), short);
    }

    #[test]
    fn parse_rejects_empty_and_bad_items() {
        let ok: ValueList<f32> = ValueList::from_raw(&"1, 2.5".into()).unwrap();
        assert_eq!(ok.as_slice(), &[1.0, 2.5]);

        assert_eq!(
            ValueList::<f32>::from_raw(&"".into()),
            Err(ConversionError::Empty)
        );
        assert!(ValueList::<f32>::from_raw(&"1, fast".into()).is_err());
    }
}
