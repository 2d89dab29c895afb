// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element resolved style snapshot.

use alloc::vec::Vec;
use smallvec::SmallVec;
use understory_property::{Affects, ErasedValue, Property, PropertyId, PropertyRegistry};

use crate::tree::NodeId;

/// The final values of one element.
///
/// Every registered property has exactly one value at all times; before the
/// first pass these are the initial values. Each pass that commits into the
/// snapshot bumps its [`generation`](Self::generation), and every property
/// records the generation at which it last changed.
#[derive(Clone, Debug)]
pub struct NodeStyle {
    values: Vec<ErasedValue>,
    changed_at: Vec<u64>,
    generation: u64,
    parent: Option<NodeId>,
    animating: SmallVec<[PropertyId; 4]>,
}

impl NodeStyle {
    pub(crate) fn new(initial: Vec<ErasedValue>, parent: Option<NodeId>) -> Self {
        Self {
            changed_at: alloc::vec![0; initial.len()],
            values: initial,
            generation: 0,
            parent,
            animating: SmallVec::new(),
        }
    }

    /// Returns the value of a property.
    ///
    /// # Panics
    ///
    /// Panics if `property` comes from a different registry than the one this
    /// style was resolved with.
    #[must_use]
    pub fn get<T: 'static>(&self, property: Property<T>) -> &T {
        match self.try_get(property) {
            Some(value) => value,
            None => panic!(
                "{:?} is not a property of this style's registry",
                property.id()
            ),
        }
    }

    /// Returns the value of a property, or `None` for a foreign handle.
    #[must_use]
    pub fn try_get<T: 'static>(&self, property: Property<T>) -> Option<&T> {
        typed(&self.values, property)
    }

    /// Returns the type-erased value of a property.
    #[must_use]
    pub fn get_erased(&self, property: PropertyId) -> Option<&ErasedValue> {
        self.values.get(property.slot())
    }

    /// All values, indexed by property id.
    #[must_use]
    pub fn values(&self) -> &[ErasedValue] {
        &self.values
    }

    /// The number of passes committed into this snapshot.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The parent element this style inherits from.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Properties whose value changed after generation `since`.
    ///
    /// ```rust
    /// use understory_motion::ManualClock;
    /// use understory_style::{Declaration, NoReferences, StyleEngine};
    ///
    /// let mut engine = StyleEngine::builder().build();
    /// let props = engine.properties().clone();
    /// let node = engine.insert(None, vec![Declaration::new("opacity", 0.5)]).unwrap();
    /// let clock = ManualClock::new();
    ///
    /// engine.resolve(&clock, &NoReferences);
    /// let seen = engine.style(node).unwrap().generation();
    ///
    /// engine.set_declarations(node, vec![Declaration::new("z-index", 3)]);
    /// engine.resolve(&clock, &NoReferences);
    /// let style = engine.style(node).unwrap();
    /// let mut changed: Vec<_> = style.changed_since(seen).collect();
    /// changed.sort();
    /// assert_eq!(changed, vec![props.opacity.id(), props.z_index.id()]);
    /// ```
    pub fn changed_since(&self, since: u64) -> impl Iterator<Item = PropertyId> + '_ {
        self.changed_at
            .iter()
            .enumerate()
            .filter(move |(_, at)| **at > since)
            .map(|(i, _)| {
                #[expect(clippy::cast_possible_truncation, reason = "ids are u16")]
                let index = i as u16;
                PropertyId::new(index)
            })
    }

    /// The union of the consumer domains affected by changes after `since`.
    #[must_use]
    pub fn affected_since(&self, since: u64, registry: &PropertyRegistry) -> Affects {
        self.changed_since(since)
            .fold(Affects::empty(), |acc, id| acc | registry.affects(id))
    }

    /// Returns `true` if the property's value is moving with time.
    ///
    /// Consumers should re-read such properties every frame instead of
    /// caching them.
    #[must_use]
    pub fn is_animating(&self, property: PropertyId) -> bool {
        self.animating.contains(&property)
    }

    /// Properties currently moving with time.
    #[must_use]
    pub fn animating(&self) -> &[PropertyId] {
        &self.animating
    }

    /// Commits the values of a pass.
    ///
    /// Values equal to the previous ones keep the previous allocation, so list
    /// identity survives passes that change nothing.
    pub(crate) fn commit(
        &mut self,
        values: Vec<ErasedValue>,
        animating: SmallVec<[PropertyId; 4]>,
        parent: Option<NodeId>,
    ) {
        self.generation += 1;
        let generation = self.generation;
        if self.values.len() != values.len() {
            self.changed_at = alloc::vec![generation; values.len()];
            self.values = values;
        } else {
            for ((slot, at), value) in self
                .values
                .iter_mut()
                .zip(self.changed_at.iter_mut())
                .zip(values)
            {
                if *slot != value {
                    *slot = value;
                    *at = generation;
                }
            }
        }
        self.animating = animating;
        self.parent = parent;
    }
}

/// Reads a typed value out of a registry-indexed slice.
pub(crate) fn typed<T: 'static>(values: &[ErasedValue], property: Property<T>) -> Option<&T> {
    values
        .get(property.id().slot())
        .and_then(ErasedValue::downcast_ref)
}
