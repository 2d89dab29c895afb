// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyframe timelines.
//!
//! A [`KeyframeSet`] is a named timeline: an ordered sequence of frames, each
//! at an offset in `0.0..=1.0` carrying values for some properties. Internally
//! it is stored per property as a track, which is what sampling needs.
//!
//! ```rust
//! use understory_motion::{Keyframe, KeyframeLibrary, KeyframeSet};
//! use understory_property::{PropertyMetadataBuilder, PropertyRegistry};
//!
//! let mut registry = PropertyRegistry::new();
//! let opacity = registry.register(
//!     "opacity",
//!     PropertyMetadataBuilder::new(1.0_f32).parsed().animatable().build(),
//! );
//!
//! let fade = KeyframeSet::new([
//!     Keyframe::new(0.0).set(opacity, 0.0),
//!     Keyframe::new(1.0).set_raw(&registry, "opacity", &"1".into()).unwrap(),
//! ]);
//!
//! let mut library = KeyframeLibrary::new();
//! library.insert("fade", fade);
//! assert_eq!(library.get("fade").unwrap().properties().count(), 1);
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_property::{
    ErasedValue, Property, PropertyId, PropertyRegistry, PropertyValue, RawValue, StyleError, snap,
};

use crate::timing::TimingFunction;

/// One frame of a timeline under construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    offset: f32,
    timing: Option<TimingFunction>,
    values: SmallVec<[(PropertyId, ErasedValue); 4]>,
}

impl Keyframe {
    /// Starts a frame at `offset`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(offset: f32) -> Self {
        Self {
            offset: if offset.is_nan() {
                0.0
            } else {
                offset.clamp(0.0, 1.0)
            },
            timing: None,
            values: SmallVec::new(),
        }
    }

    /// Starts a frame at a percentage (`50.0` is the middle).
    #[must_use]
    pub fn percent(percent: f32) -> Self {
        Self::new(percent / 100.0)
    }

    /// Sets the timing function of the segment starting at this frame.
    ///
    /// Without one, the animation's own timing function is used.
    #[must_use]
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Sets a typed value.
    #[must_use]
    pub fn set<T: PropertyValue>(self, property: Property<T>, value: T) -> Self {
        self.set_erased(property.id(), ErasedValue::new(value))
    }

    /// Sets an already erased value.
    #[must_use]
    pub fn set_erased(mut self, property: PropertyId, value: ErasedValue) -> Self {
        if let Some(slot) = self.values.iter_mut().find(|(id, _)| *id == property) {
            slot.1 = value;
        } else {
            self.values.push((property, value));
        }
        self
    }

    /// Sets a value by property name, converting it through the registry.
    pub fn set_raw(
        self,
        registry: &PropertyRegistry,
        name: &str,
        raw: &RawValue,
    ) -> Result<Self, StyleError> {
        let id = registry.lookup(name)?;
        let registration = registry
            .get(id)
            .ok_or_else(|| StyleError::UnknownProperty { name: name.into() })?;
        let value = registration
            .convert(raw)
            .map_err(|source| StyleError::Conversion {
                property: registration.name(),
                source,
            })?;
        Ok(self.set_erased(id, value))
    }

    /// Returns the offset.
    #[must_use]
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }
}

/// A point on one property's track.
#[derive(Clone, Debug, PartialEq)]
struct TrackPoint {
    offset: f32,
    value: ErasedValue,
    timing: Option<TimingFunction>,
}

/// A named keyframe timeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeSet {
    tracks: Vec<(PropertyId, Vec<TrackPoint>)>,
}

impl KeyframeSet {
    /// Builds a timeline from frames in any order.
    ///
    /// Frames are ordered by offset; frames sharing an offset keep their
    /// relative order, and the later one wins for a property they both set.
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = Keyframe>) -> Self {
        let mut frames: Vec<Keyframe> = frames.into_iter().collect();
        frames.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        let mut tracks: Vec<(PropertyId, Vec<TrackPoint>)> = Vec::new();
        for frame in frames {
            for (property, value) in frame.values {
                let index = match tracks.iter().position(|(id, _)| *id == property) {
                    Some(i) => i,
                    None => {
                        tracks.push((property, Vec::new()));
                        tracks.len() - 1
                    }
                };
                let track = &mut tracks[index].1;
                let point = TrackPoint {
                    offset: frame.offset,
                    value,
                    timing: frame.timing,
                };
                match track.last_mut() {
                    Some(last) if last.offset == frame.offset => *last = point,
                    _ => track.push(point),
                }
            }
        }
        Self { tracks }
    }

    /// Iterates over the properties this timeline drives.
    pub fn properties(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.tracks.iter().map(|(id, _)| *id)
    }

    /// Returns `true` if the timeline drives `property`.
    #[must_use]
    pub fn drives(&self, property: PropertyId) -> bool {
        self.tracks.iter().any(|(id, _)| *id == property)
    }

    /// Samples one property at keyframe progress `progress`.
    ///
    /// `base` stands in for a missing `0%` or `100%` frame. The segment's
    /// timing function (or `timing` when the frame has none) eases progress
    /// within the segment. Non-animatable properties switch to the next frame
    /// at the end of a segment.
    #[must_use]
    pub fn sample(
        &self,
        property: PropertyId,
        progress: f32,
        base: &ErasedValue,
        timing: TimingFunction,
        registry: &PropertyRegistry,
    ) -> Option<ErasedValue> {
        let (_, points) = self.tracks.iter().find(|(id, _)| *id == property)?;
        let progress = progress.clamp(0.0, 1.0);

        let first = points.first()?;
        let last = points.last()?;
        let start = if first.offset > 0.0 {
            Some(TrackPoint {
                offset: 0.0,
                value: base.clone(),
                timing: None,
            })
        } else {
            None
        };
        let end = if last.offset < 1.0 {
            Some(TrackPoint {
                offset: 1.0,
                value: base.clone(),
                timing: None,
            })
        } else {
            None
        };
        let mut frames = start.iter().chain(points.iter()).chain(end.iter());

        let mut from = frames.next()?;
        for to in frames {
            if progress <= to.offset {
                let span = to.offset - from.offset;
                let local = if span > 0.0 {
                    (progress - from.offset) / span
                } else {
                    1.0
                };
                let eased = from.timing.unwrap_or(timing).sample(local);
                let blended = registry
                    .get(property)
                    .and_then(|r| r.interpolate(&from.value, &to.value, eased));
                return Some(blended.unwrap_or_else(|| snap(&from.value, &to.value, eased)));
            }
            from = to;
        }
        Some(from.value.clone())
    }
}

/// Named keyframe timelines.
#[derive(Clone, Debug, Default)]
pub struct KeyframeLibrary {
    sets: HashMap<String, KeyframeSet>,
}

impl KeyframeLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a timeline.
    pub fn insert(&mut self, name: impl Into<String>, set: KeyframeSet) -> Option<KeyframeSet> {
        self.sets.insert(name.into(), set)
    }

    /// Removes a timeline.
    pub fn remove(&mut self, name: &str) -> Option<KeyframeSet> {
        self.sets.remove(name)
    }

    /// Returns a timeline by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KeyframeSet> {
        self.sets.get(name)
    }

    /// Returns the number of timelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if the library holds no timelines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
