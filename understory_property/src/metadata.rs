// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property metadata definitions.
//!
//! [`PropertyMetadata`] describes one property: its initial value, whether it
//! inherits, whether it may be animated, which consumers a change affects, and
//! how raw declared values are converted into its value type.

use alloc::boxed::Box;

use crate::error::ConversionError;
use crate::list::{ValueList, parse_list};
use crate::raw::{FromRaw, RawValue};
use crate::value::{Interpolate, PropertyValue};

bitflags::bitflags! {
    /// Consumer domains invalidated when a property's value changes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Affects: u8 {
        /// Box layout (sizes, positions, font metrics).
        const LAYOUT    = 0b0000_0001;
        /// Backgrounds, borders, shadows.
        const PAINT     = 0b0000_0010;
        /// Text shaping and text rendering.
        const TEXT      = 0b0000_0100;
        /// Compositing only (opacity, transforms).
        const COMPOSITE = 0b0000_1000;
    }
}

/// Converts a raw declared value into a property's value type.
pub type ConvertCallback<T> = Box<dyn Fn(&RawValue) -> Result<T, ConversionError> + Send + Sync>;

/// Adjusts a converted value before it is used (clamping, normalizing).
pub type CoerceValueCallback<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// Metadata for a style property.
///
/// ```rust
/// use understory_property::{Affects, PropertyMetadataBuilder, RawValue};
///
/// let opacity = PropertyMetadataBuilder::new(1.0_f32)
///     .animatable()
///     .affects(Affects::COMPOSITE)
///     .converter(understory_property::percentage)
///     .coerce(|v| v.clamp(0.0, 1.0))
///     .build();
///
/// assert!(opacity.is_animatable());
/// assert_eq!(opacity.convert(&RawValue::from("50%")), Ok(0.5));
/// assert_eq!(opacity.convert(&RawValue::from(3.0)), Ok(1.0));
/// ```
pub struct PropertyMetadata<T: PropertyValue> {
    default_value: T,
    inherits: bool,
    affects: Affects,
    interpolate: Option<fn(&T, &T, f32) -> T>,
    converter: Option<ConvertCallback<T>>,
    coerce: Option<CoerceValueCallback<T>>,
}

impl<T: PropertyValue> PropertyMetadata<T> {
    /// Creates metadata with the given initial value and nothing else set.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        PropertyMetadataBuilder::new(default_value).build()
    }

    /// Returns the initial value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Returns whether an unset value is taken from the parent element.
    #[must_use]
    #[inline]
    pub fn inherits(&self) -> bool {
        self.inherits
    }

    /// Returns whether the property participates in transitions and animations.
    #[must_use]
    #[inline]
    pub fn is_animatable(&self) -> bool {
        self.interpolate.is_some()
    }

    /// Returns the consumer domains a change affects.
    #[must_use]
    #[inline]
    pub fn affects(&self) -> Affects {
        self.affects
    }

    /// Converts a raw value.
    ///
    /// A [`RawValue::Typed`] literal of type `T` is accepted as-is; anything
    /// else goes through the converter. The coerce callback runs last.
    pub fn convert(&self, raw: &RawValue) -> Result<T, ConversionError> {
        let value = if let RawValue::Typed(typed) = raw
            && let Some(value) = typed.downcast_ref::<T>()
        {
            value.clone()
        } else if let Some(converter) = &self.converter {
            converter(raw)?
        } else {
            return Err(ConversionError::UnexpectedType {
                expected: core::any::type_name::<T>(),
            });
        };
        Ok(self.coerce(value))
    }

    /// Applies the coerce callback, if any.
    #[inline]
    pub fn coerce(&self, value: T) -> T {
        match &self.coerce {
            Some(callback) => callback(value),
            None => value,
        }
    }

    /// Blends two values, or returns `None` for non-animatable properties.
    #[must_use]
    pub fn interpolate(&self, from: &T, to: &T, t: f32) -> Option<T> {
        self.interpolate.map(|blend| blend(from, to, t))
    }
}

impl<T: PropertyValue> core::fmt::Debug for PropertyMetadata<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("default_value", &self.default_value)
            .field("inherits", &self.inherits)
            .field("animatable", &self.is_animatable())
            .field("affects", &self.affects)
            .field("has_converter", &self.converter.is_some())
            .field("has_coerce", &self.coerce.is_some())
            .finish()
    }
}

/// Builder for [`PropertyMetadata`].
pub struct PropertyMetadataBuilder<T: PropertyValue> {
    metadata: PropertyMetadata<T>,
}

impl<T: PropertyValue> core::fmt::Debug for PropertyMetadataBuilder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("PropertyMetadataBuilder")
            .field(&self.metadata)
            .finish()
    }
}

impl<T: PropertyValue> PropertyMetadataBuilder<T> {
    /// Starts a builder with the given initial value.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            metadata: PropertyMetadata {
                default_value,
                inherits: false,
                affects: Affects::empty(),
                interpolate: None,
                converter: None,
                coerce: None,
            },
        }
    }

    /// Sets whether an unset value is taken from the parent element.
    #[must_use]
    pub fn inherits(mut self, inherits: bool) -> Self {
        self.metadata.inherits = inherits;
        self
    }

    /// Sets the consumer domains a change affects.
    #[must_use]
    pub fn affects(mut self, affects: Affects) -> Self {
        self.metadata.affects = affects;
        self
    }

    /// Sets the converter for raw declared values.
    #[must_use]
    pub fn converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&RawValue) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        self.metadata.converter = Some(Box::new(converter));
        self
    }

    /// Sets a callback that adjusts every converted value.
    #[must_use]
    pub fn coerce<F>(mut self, callback: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.metadata.coerce = Some(Box::new(callback));
        self
    }

    /// Builds the metadata.
    #[must_use]
    pub fn build(self) -> PropertyMetadata<T> {
        self.metadata
    }
}

impl<T: PropertyValue + FromRaw> PropertyMetadataBuilder<T> {
    /// Uses the type's [`FromRaw`] conversion.
    #[must_use]
    pub fn parsed(self) -> Self {
        self.converter(T::from_raw)
    }
}

impl<T: PropertyValue> PropertyMetadataBuilder<ValueList<T>> {
    /// Starts a builder for a comma-list property.
    ///
    /// The initial value is the one-item list `[item_default]`, and raw values
    /// are split into items converted by `item`. See [`parse_list`].
    #[must_use]
    pub fn list<F>(item_default: T, item: F) -> Self
    where
        F: Fn(&RawValue) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        Self::new(ValueList::single(item_default)).converter(move |raw| parse_list(raw, &item))
    }
}

impl<T: Interpolate> PropertyMetadataBuilder<T> {
    /// Marks the property as animatable.
    ///
    /// Only types that implement [`Interpolate`] can be animatable, so keyword
    /// properties are kept out of transitions at registration time.
    #[must_use]
    pub fn animatable(mut self) -> Self {
        self.metadata.interpolate = Some(T::interpolate);
        self
    }
}
