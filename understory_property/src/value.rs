// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value traits and type-erased value storage.
//!
//! Every property value type implements [`PropertyValue`] (a blanket trait).
//! Types that can move smoothly between two values also implement
//! [`Interpolate`]; only those may be registered as animatable.
//!
//! [`ErasedValue`] stores a value of any [`PropertyValue`] type so that
//! per-element tables can hold heterogeneous properties side by side.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

/// Bounds shared by every property value type.
///
/// Equality drives change detection between passes, and `Send + Sync` lets
/// registry defaults live in a process-wide table.
pub trait PropertyValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> PropertyValue for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// Values that can be blended between two endpoints.
///
/// `t` is a progress in `0.0..=1.0` (timing functions may overshoot slightly).
/// Implementations for composite types blend per component. Kinds that cannot
/// blend (mismatched units, keywords) return `to` once `t >= 1.0` and `self`
/// before that.
pub trait Interpolate: PropertyValue {
    /// Returns the value at progress `t` from `self` towards `to`.
    #[must_use]
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for f64 {
    #[inline]
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * f64::from(t)
    }
}

/// Discrete fallback used by types that cannot blend.
#[inline]
#[must_use]
pub fn snap<T: Clone>(from: &T, to: &T, t: f32) -> T {
    if t >= 1.0 { to.clone() } else { from.clone() }
}

/// A type-erased property value.
///
/// ```rust
/// use understory_property::ErasedValue;
///
/// let a = ErasedValue::new(0.5_f32);
/// let b = a.clone();
/// assert_eq!(a, b);
/// assert_eq!(a.downcast_ref::<f32>(), Some(&0.5));
/// assert_ne!(a, ErasedValue::new(0.5_f64));
/// ```
pub struct ErasedValue {
    inner: Box<dyn DynValue>,
    type_id: TypeId,
}

impl ErasedValue {
    /// Erases a concrete value.
    #[must_use]
    pub fn new<T: PropertyValue>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            inner: Box::new(value),
        }
    }

    /// Returns the [`TypeId`] of the stored value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns `true` if the stored value is a `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrows the stored value as a `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }
}

impl Clone for ErasedValue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_boxed(),
            type_id: self.type_id,
        }
    }
}

impl PartialEq for ErasedValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.inner.dyn_eq(other.inner.as_any())
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.dyn_fmt(f)
    }
}

trait DynValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn DynValue>;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: PropertyValue> DynValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn DynValue> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| other == self)
    }

    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
