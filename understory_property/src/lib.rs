// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Property: typed style property descriptors.
//!
//! This crate provides the property registry that the style engine and the
//! motion driver are built on. It knows nothing about CSS vocabulary; the
//! concrete property table lives in `understory_style`.
//!
//! ## Core Concepts
//!
//! ### Properties
//!
//! A property is registered once, with [`PropertyMetadata`] describing:
//!
//! - its **initial value**, used when nothing is declared and nothing is inherited
//! - whether it **inherits** from the parent element
//! - whether it is **animatable** (only [`Interpolate`] types can be)
//! - which consumers a change **affects** ([`Affects`])
//! - a **converter** from loosely typed [`RawValue`]s
//!
//! Registration hands back a [`Property<T>`] handle, a typed wrapper around a
//! compact [`PropertyId`].
//!
//! ### Lists
//!
//! Comma-list properties hold a [`ValueList`]. Co-varying lists are aligned to
//! a primary list by cycling (see [`ValueList::cycled`] and [`iteration_count`]).
//!
//! ### Erased values
//!
//! Per-element tables store [`ErasedValue`]s indexed by [`PropertyId`], so
//! heterogeneous properties share one dense vector. The registry performs
//! conversion, defaulting and interpolation on erased values.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_property::{
//!     Affects, PropertyMetadataBuilder, PropertyRegistry, RawValue, ValueList,
//! };
//!
//! let mut registry = PropertyRegistry::new();
//! let opacity = registry.register(
//!     "opacity",
//!     PropertyMetadataBuilder::new(1.0_f32)
//!         .converter(understory_property::percentage)
//!         .animatable()
//!         .affects(Affects::COMPOSITE)
//!         .build(),
//! );
//! let durations = registry.register(
//!     "transition-duration",
//!     PropertyMetadataBuilder::list(0.0_f32, understory_property::duration).build(),
//! );
//!
//! let metadata = registry.get_metadata(opacity).unwrap();
//! assert_eq!(metadata.convert(&RawValue::from("40%")), Ok(0.4));
//!
//! let id = registry.lookup("transitionDuration").unwrap();
//! assert_eq!(id, durations.id());
//! let converted = registry.get(id).unwrap().convert(&"1s, 200ms".into()).unwrap();
//! assert_eq!(
//!     converted.downcast_ref::<ValueList<f32>>().map(|l| l.as_slice()),
//!     Some(&[1.0, 0.2][..])
//! );
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod error;
mod id;
mod list;
mod metadata;
mod raw;
mod registry;
mod value;

pub use error::{ConversionError, StyleError};
pub use id::{Property, PropertyId};
pub use list::{ValueList, iteration_count, parse_list};
pub use metadata::{
    Affects, CoerceValueCallback, ConvertCallback, PropertyMetadata, PropertyMetadataBuilder,
};
pub use raw::{
    FromRaw, RawValue, delay, duration, keyword, percentage, split_top_level, split_unit,
    split_whitespace_top_level,
};
pub use registry::{PropertyRegistration, PropertyRegistry};
pub use value::{ErasedValue, Interpolate, PropertyValue, snap};
