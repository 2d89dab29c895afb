// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property registry.
//!
//! [`PropertyRegistry`] owns every property descriptor. It is populated once at
//! startup and read-only afterwards: resolution code only ever holds `&PropertyRegistry`.
//!
//! Name lookup is case-insensitive and ignores `-` and `_`, so the camel and
//! dashed spellings of a property reach the same descriptor. Additional names
//! can be attached with [`PropertyRegistry::alias`].

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use hashbrown::HashMap;

use crate::error::{ConversionError, StyleError};
use crate::id::{Property, PropertyId};
use crate::list::ValueList;
use crate::metadata::{Affects, PropertyMetadata, PropertyMetadataBuilder};
use crate::raw::RawValue;
use crate::value::{ErasedValue, PropertyValue};

/// A registration entry for a property.
pub struct PropertyRegistration {
    name: &'static str,
    type_id: TypeId,
    metadata: Box<dyn ErasedMetadata>,
}

impl PropertyRegistration {
    /// Returns the canonical property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeId`] of the property's value type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns whether this property inherits from parents.
    #[must_use]
    #[inline]
    pub fn inherits(&self) -> bool {
        self.metadata.inherits()
    }

    /// Returns whether this property can be transitioned and animated.
    #[must_use]
    #[inline]
    pub fn is_animatable(&self) -> bool {
        self.metadata.is_animatable()
    }

    /// Returns the consumer domains a change affects.
    #[must_use]
    #[inline]
    pub fn affects(&self) -> Affects {
        self.metadata.affects()
    }

    /// Returns the initial value, erased.
    #[must_use]
    pub fn default_value(&self) -> ErasedValue {
        self.metadata.default_erased()
    }

    /// Converts a raw value into the property's value type, erased.
    pub fn convert(&self, raw: &RawValue) -> Result<ErasedValue, ConversionError> {
        self.metadata.convert_erased(raw)
    }

    /// Blends two erased values of this property.
    ///
    /// Returns `None` when the property is not animatable or the values are
    /// not of the property's type.
    #[must_use]
    pub fn interpolate(&self, from: &ErasedValue, to: &ErasedValue, t: f32) -> Option<ErasedValue> {
        self.metadata.interpolate_erased(from, to, t)
    }
}

impl core::fmt::Debug for PropertyRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyRegistration")
            .field("name", &self.name)
            .field("inherits", &self.inherits())
            .field("animatable", &self.is_animatable())
            .field("affects", &self.affects())
            .finish_non_exhaustive()
    }
}

/// The table of registered properties.
///
/// ```rust
/// use understory_property::{PropertyMetadataBuilder, PropertyRegistry, StyleError};
///
/// let mut registry = PropertyRegistry::new();
/// let z_index = registry.register("z-index", PropertyMetadataBuilder::new(0_i32).parsed().build());
///
/// assert_eq!(registry.lookup("zIndex"), Ok(z_index.id()));
/// assert_eq!(registry.lookup("Z-INDEX"), Ok(z_index.id()));
/// assert!(matches!(registry.lookup("zorder"), Err(StyleError::UnknownProperty { .. })));
/// ```
#[derive(Default)]
pub struct PropertyRegistry {
    properties: Vec<PropertyRegistration>,
    by_name: HashMap<String, PropertyId>,
}

impl PropertyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property.
    ///
    /// # Panics
    ///
    /// Panics if the name (after normalization) is already taken, or if more
    /// than 65,535 properties are registered.
    pub fn register<T: PropertyValue>(
        &mut self,
        name: &'static str,
        metadata: PropertyMetadata<T>,
    ) -> Property<T> {
        let key = normalize(name);
        assert!(
            !self.by_name.contains_key(&key),
            "Property '{name}' is already registered"
        );
        assert!(
            self.properties.len() < u16::MAX as usize,
            "Too many properties registered (max {})",
            u16::MAX
        );

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = PropertyId::new(self.properties.len() as u16);

        self.properties.push(PropertyRegistration {
            name,
            type_id: TypeId::of::<T>(),
            metadata: Box::new(metadata),
        });
        self.by_name.insert(key, id);

        Property::from_id(id)
    }

    /// Registers a comma-list property whose items are converted by `item`.
    ///
    /// The initial value is `[item_default]`. Equivalent to registering
    /// [`PropertyMetadataBuilder::list`] with the given `affects`.
    ///
    /// # Panics
    ///
    /// Same as [`register`](Self::register).
    pub fn register_list<T, F>(
        &mut self,
        name: &'static str,
        item_default: T,
        item: F,
        affects: Affects,
    ) -> Property<ValueList<T>>
    where
        T: PropertyValue,
        F: Fn(&RawValue) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        self.register(
            name,
            PropertyMetadataBuilder::list(item_default, item)
                .affects(affects)
                .build(),
        )
    }

    /// Adds another name for an already registered property.
    ///
    /// # Panics
    ///
    /// Panics if the name is taken or `id` is not registered.
    pub fn alias(&mut self, name: &str, id: PropertyId) {
        assert!(
            self.get(id).is_some(),
            "Cannot alias '{name}' to unregistered {id:?}"
        );
        let key = normalize(name);
        assert!(
            !self.by_name.contains_key(&key),
            "Property '{name}' is already registered"
        );
        self.by_name.insert(key, id);
    }

    /// Returns the number of registered properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Looks up a property by any of its names.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<PropertyId> {
        self.by_name.get(normalize(name).as_str()).copied()
    }

    /// Looks up a property, failing with [`StyleError::UnknownProperty`].
    pub fn lookup(&self, name: &str) -> Result<PropertyId, StyleError> {
        self.by_name(name).ok_or_else(|| StyleError::UnknownProperty {
            name: name.to_string(),
        })
    }

    /// Returns the canonical name of a property.
    #[must_use]
    pub fn name(&self, id: PropertyId) -> Option<&'static str> {
        self.get(id).map(PropertyRegistration::name)
    }

    /// Returns the registration for a property.
    #[must_use]
    #[inline]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyRegistration> {
        self.properties.get(id.slot())
    }

    /// Returns whether a property inherits.
    #[must_use]
    pub fn inherits(&self, id: PropertyId) -> bool {
        self.get(id).is_some_and(PropertyRegistration::inherits)
    }

    /// Returns whether a property is animatable.
    #[must_use]
    pub fn is_animatable(&self, id: PropertyId) -> bool {
        self.get(id).is_some_and(PropertyRegistration::is_animatable)
    }

    /// Returns the consumer domains a property affects.
    #[must_use]
    pub fn affects(&self, id: PropertyId) -> Affects {
        self.get(id)
            .map(PropertyRegistration::affects)
            .unwrap_or_default()
    }

    /// Returns the typed metadata of a property.
    ///
    /// Returns `None` if the property is not registered or `T` does not match.
    #[must_use]
    pub fn get_metadata<T: PropertyValue>(
        &self,
        property: Property<T>,
    ) -> Option<&PropertyMetadata<T>> {
        self.get(property.id())
            .and_then(|r| r.metadata.as_any().downcast_ref())
    }

    /// Returns the initial values of every property, indexed by id.
    #[must_use]
    pub fn defaults(&self) -> Vec<ErasedValue> {
        self.properties
            .iter()
            .map(PropertyRegistration::default_value)
            .collect()
    }

    /// Iterates over all properties in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &PropertyRegistration)> {
        self.properties.iter().enumerate().map(|(i, r)| {
            #[expect(clippy::cast_possible_truncation, reason = "index < len < u16::MAX")]
            let index = i as u16;
            (PropertyId::new(index), r)
        })
    }

    /// Iterates over the ids of animatable properties.
    pub fn animatable(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.iter()
            .filter(|(_, r)| r.is_animatable())
            .map(|(id, _)| id)
    }
}

impl core::fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("count", &self.properties.len())
            .field(
                "properties",
                &self.properties.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Lowercases and drops `-` and `_`, so `zIndex` and `z-index` collide.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Type-erased metadata for heterogeneous storage.
trait ErasedMetadata: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn inherits(&self) -> bool;
    fn is_animatable(&self) -> bool;
    fn affects(&self) -> Affects;
    fn default_erased(&self) -> ErasedValue;
    fn convert_erased(&self, raw: &RawValue) -> Result<ErasedValue, ConversionError>;
    fn interpolate_erased(&self, from: &ErasedValue, to: &ErasedValue, t: f32)
    -> Option<ErasedValue>;
}

impl<T: PropertyValue> ErasedMetadata for PropertyMetadata<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn inherits(&self) -> bool {
        Self::inherits(self)
    }

    fn is_animatable(&self) -> bool {
        Self::is_animatable(self)
    }

    fn affects(&self) -> Affects {
        Self::affects(self)
    }

    fn default_erased(&self) -> ErasedValue {
        ErasedValue::new(self.default_value().clone())
    }

    fn convert_erased(&self, raw: &RawValue) -> Result<ErasedValue, ConversionError> {
        self.convert(raw).map(ErasedValue::new)
    }

    fn interpolate_erased(
        &self,
        from: &ErasedValue,
        to: &ErasedValue,
        t: f32,
    ) -> Option<ErasedValue> {
        let from = from.downcast_ref::<T>()?;
        let to = to.downcast_ref::<T>()?;
        self.interpolate(from, to, t).map(ErasedValue::new)
    }
}
