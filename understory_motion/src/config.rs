// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element transition and animation configuration.
//!
//! These are the value types of the `transition-*` and `animation-*` list
//! properties, plus [`TransitionConfig`] and [`AnimationConfig`], which bundle
//! an element's resolved lists for the motion driver.

use alloc::string::{String, ToString};
use understory_property::{
    ConversionError, FromRaw, PropertyId, PropertyRegistry, RawValue, ValueList, keyword,
};

use crate::timing::TimingFunction;

/// Whether a transition or animation clock advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// The local clock advances with the pass clock.
    #[default]
    Running,
    /// The local clock is frozen; state is kept.
    Paused,
}

impl FromRaw for PlayState {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        keyword(raw, &[("running", Self::Running), ("paused", Self::Paused)])
    }
}

/// Playback direction of an animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Every iteration runs from `0%` to `100%`.
    #[default]
    Normal,
    /// Every iteration runs from `100%` to `0%`.
    Reverse,
    /// Even iterations run forwards, odd ones backwards.
    Alternate,
    /// Even iterations run backwards, odd ones forwards.
    AlternateReverse,
}

impl Direction {
    /// Maps progress within `iteration` onto keyframe progress.
    #[must_use]
    pub fn apply(self, iteration: u64, progress: f32) -> f32 {
        let odd = iteration % 2 == 1;
        let backwards = match self {
            Self::Normal => false,
            Self::Reverse => true,
            Self::Alternate => odd,
            Self::AlternateReverse => !odd,
        };
        if backwards { 1.0 - progress } else { progress }
    }
}

impl FromRaw for Direction {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        keyword(
            raw,
            &[
                ("normal", Self::Normal),
                ("reverse", Self::Reverse),
                ("alternate", Self::Alternate),
                ("alternate-reverse", Self::AlternateReverse),
            ],
        )
    }
}

/// Whether an animation's boundary values apply outside its active interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillMode {
    /// Nothing is applied outside the active interval.
    #[default]
    None,
    /// The final value is held after the animation finishes.
    Forwards,
    /// The first value is applied during the delay.
    Backwards,
    /// Both [`Forwards`](Self::Forwards) and [`Backwards`](Self::Backwards).
    Both,
}

impl FillMode {
    /// Returns `true` if the final value is held after completion.
    #[must_use]
    #[inline]
    pub fn fills_forwards(self) -> bool {
        matches!(self, Self::Forwards | Self::Both)
    }

    /// Returns `true` if the first value applies during the delay.
    #[must_use]
    #[inline]
    pub fn fills_backwards(self) -> bool {
        matches!(self, Self::Backwards | Self::Both)
    }
}

impl FromRaw for FillMode {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        keyword(
            raw,
            &[
                ("none", Self::None),
                ("forwards", Self::Forwards),
                ("backwards", Self::Backwards),
                ("both", Self::Both),
            ],
        )
    }
}

/// How many times an animation runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IterationCount {
    /// A finite, possibly fractional, count.
    Count(f32),
    /// Runs forever.
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        Self::Count(1.0)
    }
}

impl FromRaw for IterationCount {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        if let Some(word) = raw.as_str()
            && word.eq_ignore_ascii_case("infinite")
        {
            return Ok(Self::Infinite);
        }
        let count = f32::from_raw(raw)?;
        if count < 0.0 || count.is_nan() {
            return Err(ConversionError::OutOfRange {
                expected: "a non-negative iteration count",
            });
        }
        Ok(Self::Count(count))
    }
}

/// One entry of a `transition-property` list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionProperty {
    /// Every animatable property.
    #[default]
    All,
    /// No property.
    None,
    /// A property by name; resolved through the registry when matched.
    Named(String),
}

impl TransitionProperty {
    /// Returns `true` if this entry selects `property`.
    #[must_use]
    pub fn matches(&self, property: PropertyId, registry: &PropertyRegistry) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Named(name) => registry.by_name(name) == Some(property),
        }
    }
}

impl FromRaw for TransitionProperty {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        let name = raw.to_keyword()?;
        if name.is_empty() {
            return Err(ConversionError::Empty);
        }
        Ok(if name.eq_ignore_ascii_case("all") {
            Self::All
        } else if name.eq_ignore_ascii_case("none") {
            Self::None
        } else {
            Self::Named(name.to_string())
        })
    }
}

/// Timing parameters of one transition slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSlot {
    /// Duration in seconds.
    pub duration: f32,
    /// Delay in seconds; negative delays start part-way through.
    pub delay: f32,
    /// Easing.
    pub timing: TimingFunction,
    /// Whether the transition clock advances.
    pub play_state: PlayState,
}

/// An element's resolved `transition-*` lists.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionConfig {
    /// `transition-property`; the primary list.
    pub properties: ValueList<TransitionProperty>,
    /// `transition-duration`, cycled against `properties`.
    pub durations: ValueList<f32>,
    /// `transition-delay`, cycled against `properties`.
    pub delays: ValueList<f32>,
    /// `transition-timing-function`, cycled against `properties`.
    pub timing_functions: ValueList<TimingFunction>,
    /// `transition-play-state`, cycled against `properties`.
    pub play_states: ValueList<PlayState>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            properties: ValueList::single(TransitionProperty::All),
            durations: ValueList::single(0.0),
            delays: ValueList::single(0.0),
            timing_functions: ValueList::single(TimingFunction::Ease),
            play_states: ValueList::single(PlayState::Running),
        }
    }
}

impl TransitionConfig {
    /// Returns the slot configured for `property`.
    ///
    /// The last matching `transition-property` entry wins; the other lists are
    /// cycled to its index. Returns `None` when nothing matches or the slot's
    /// duration is not positive.
    #[must_use]
    pub fn slot_for(
        &self,
        property: PropertyId,
        registry: &PropertyRegistry,
    ) -> Option<TransitionSlot> {
        let index = self
            .properties
            .iter()
            .rposition(|entry| entry.matches(property, registry))?;
        let slot = TransitionSlot {
            duration: *self.durations.cycled_or(index, &0.0),
            delay: *self.delays.cycled_or(index, &0.0),
            timing: *self.timing_functions.cycled_or(index, &TimingFunction::Ease),
            play_state: *self.play_states.cycled_or(index, &PlayState::Running),
        };
        (slot.duration > 0.0).then_some(slot)
    }
}

/// Parameters of one `animation-name` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSpec {
    /// Keyframe set name.
    pub name: String,
    /// Duration of one iteration, in seconds.
    pub duration: f32,
    /// Delay in seconds; negative delays start part-way through.
    pub delay: f32,
    /// Easing, applied per keyframe segment.
    pub timing: TimingFunction,
    /// Iteration count.
    pub iterations: IterationCount,
    /// Playback direction.
    pub direction: Direction,
    /// Fill mode.
    pub fill: FillMode,
    /// Whether the animation clock advances.
    pub play_state: PlayState,
}

/// An element's resolved `animation-*` lists.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// `animation-name`; the primary list. `none` entries are skipped.
    pub names: ValueList<String>,
    /// `animation-duration`.
    pub durations: ValueList<f32>,
    /// `animation-delay`.
    pub delays: ValueList<f32>,
    /// `animation-timing-function`.
    pub timing_functions: ValueList<TimingFunction>,
    /// `animation-iteration-count`.
    pub iteration_counts: ValueList<IterationCount>,
    /// `animation-direction`.
    pub directions: ValueList<Direction>,
    /// `animation-fill-mode`.
    pub fill_modes: ValueList<FillMode>,
    /// `animation-play-state`.
    pub play_states: ValueList<PlayState>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            names: ValueList::single(String::from("none")),
            durations: ValueList::single(0.0),
            delays: ValueList::single(0.0),
            timing_functions: ValueList::single(TimingFunction::Ease),
            iteration_counts: ValueList::single(IterationCount::default()),
            directions: ValueList::single(Direction::Normal),
            fill_modes: ValueList::single(FillMode::None),
            play_states: ValueList::single(PlayState::Running),
        }
    }
}

impl AnimationConfig {
    /// Iterates over the configured animations, in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = AnimationSpec> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty() && !name.eq_ignore_ascii_case("none"))
            .map(|(i, name)| AnimationSpec {
                name: name.clone(),
                duration: *self.durations.cycled_or(i, &0.0),
                delay: *self.delays.cycled_or(i, &0.0),
                timing: *self.timing_functions.cycled_or(i, &TimingFunction::Ease),
                iterations: *self
                    .iteration_counts
                    .cycled_or(i, &IterationCount::Count(1.0)),
                direction: *self.directions.cycled_or(i, &Direction::Normal),
                fill: *self.fill_modes.cycled_or(i, &FillMode::None),
                play_state: *self.play_states.cycled_or(i, &PlayState::Running),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use understory_property::PropertyMetadataBuilder;

    fn registry() -> (PropertyRegistry, PropertyId, PropertyId) {
        let mut registry = PropertyRegistry::new();
        let opacity = registry
            .register("opacity", PropertyMetadataBuilder::new(1.0_f32).animatable().build())
            .id();
        let width = registry
            .register("width", PropertyMetadataBuilder::new(0.0_f32).animatable().build())
            .id();
        (registry, opacity, width)
    }

    #[test]
    fn keywords_parse() {
        assert_eq!(PlayState::from_raw(&"paused".into()), Ok(PlayState::Paused));
        assert_eq!(
            Direction::from_raw(&"alternate-reverse".into()),
            Ok(Direction::AlternateReverse)
        );
        assert_eq!(FillMode::from_raw(&"Both".into()), Ok(FillMode::Both));
        assert_eq!(
            IterationCount::from_raw(&"infinite".into()),
            Ok(IterationCount::Infinite)
        );
        assert_eq!(
            IterationCount::from_raw(&2.5.into()),
            Ok(IterationCount::Count(2.5))
        );
        assert!(IterationCount::from_raw(&(-1.0).into()).is_err());
        assert_eq!(
            TransitionProperty::from_raw(&"ALL".into()),
            Ok(TransitionProperty::All)
        );
    }

    #[test]
    fn directions_flip_progress() {
        assert_eq!(Direction::Normal.apply(1, 0.25), 0.25);
        assert_eq!(Direction::Reverse.apply(0, 0.25), 0.75);
        assert_eq!(Direction::Alternate.apply(0, 0.25), 0.25);
        assert_eq!(Direction::Alternate.apply(1, 0.25), 0.75);
        assert_eq!(Direction::AlternateReverse.apply(0, 0.25), 0.75);
    }

    #[test]
    fn transition_slots_cycle_and_last_match_wins() {
        let (registry, opacity, width) = registry();
        let config = TransitionConfig {
            properties: ValueList::new(vec![
                TransitionProperty::Named("opacity".into()),
                TransitionProperty::Named("width".into()),
                TransitionProperty::Named("Opacity".into()),
            ]),
            durations: ValueList::new(vec![1.0, 2.0]),
            ..TransitionConfig::default()
        };
        // Index 2 cycles back to the first duration.
        assert_eq!(config.slot_for(opacity, &registry).unwrap().duration, 1.0);
        assert_eq!(config.slot_for(width, &registry).unwrap().duration, 2.0);
    }

    #[test]
    fn zero_duration_and_none_disable_transitions() {
        let (registry, opacity, _) = registry();
        assert_eq!(TransitionConfig::default().slot_for(opacity, &registry), None);

        let none = TransitionConfig {
            properties: ValueList::single(TransitionProperty::None),
            durations: ValueList::single(1.0),
            ..TransitionConfig::default()
        };
        assert_eq!(none.slot_for(opacity, &registry), None);
    }

    #[test]
    fn animation_specs_skip_none() {
        let config = AnimationConfig {
            names: ValueList::new(vec!["fade".into(), "none".into(), "spin".into()]),
            durations: ValueList::new(vec![1.0, 2.0]),
            ..AnimationConfig::default()
        };
        let specs: Vec<_> = config.specs().collect();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "fade");
        assert_eq!(specs[1].name, "spin");
        assert_eq!(specs[1].duration, 1.0);
        assert_eq!(AnimationConfig::default().specs().count(), 0);
    }
}
