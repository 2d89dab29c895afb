// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Implicit transitions between a property's old and new target.

use understory_property::{ErasedValue, PropertyId, PropertyRegistry, snap};

use crate::config::{PlayState, TransitionSlot};

/// An in-flight transition of one property on one element.
///
/// The transition keeps a local clock that advances with each pass while
/// its play state is running, so pausing freezes it without losing state.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionState {
    property: PropertyId,
    start: ErasedValue,
    end: ErasedValue,
    slot: TransitionSlot,
    /// Local time since the transition was created, delay included.
    elapsed: f64,
    last_tick: f64,
}

impl TransitionState {
    /// Starts a transition at `now`.
    #[must_use]
    pub fn new(
        property: PropertyId,
        start: ErasedValue,
        end: ErasedValue,
        slot: TransitionSlot,
        now: f64,
    ) -> Self {
        Self {
            property,
            start,
            end,
            slot,
            elapsed: 0.0,
            last_tick: now,
        }
    }

    /// The transitioned property.
    #[must_use]
    #[inline]
    pub fn property(&self) -> PropertyId {
        self.property
    }

    /// The value the transition started from.
    #[must_use]
    #[inline]
    pub fn start(&self) -> &ErasedValue {
        &self.start
    }

    /// The value the transition is heading to.
    #[must_use]
    #[inline]
    pub fn end(&self) -> &ErasedValue {
        &self.end
    }

    /// The slot timing parameters in use.
    #[must_use]
    #[inline]
    pub fn slot(&self) -> &TransitionSlot {
        &self.slot
    }

    /// Advances the local clock to `now` and adopts `slot`.
    ///
    /// Time passes only while the slot's play state is running. The slot is
    /// re-read every pass so that play-state changes take effect.
    pub fn tick(&mut self, now: f64, slot: TransitionSlot) {
        if self.slot.play_state == PlayState::Running && now > self.last_tick {
            self.elapsed += now - self.last_tick;
        }
        self.last_tick = now;
        self.slot = slot;
    }

    /// Linear progress in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let active = self.elapsed - f64::from(self.slot.delay);
        if active <= 0.0 {
            return 0.0;
        }
        let duration = f64::from(self.slot.duration);
        if duration <= 0.0 || active >= duration {
            return 1.0;
        }
        #[expect(clippy::cast_possible_truncation, reason = "progress fits in f32")]
        let progress = (active / duration) as f32;
        progress
    }

    /// Returns `true` once the end has been reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Returns the value at the current local time.
    ///
    /// A finished transition yields its end value exactly.
    #[must_use]
    pub fn value(&self, registry: &PropertyRegistry) -> ErasedValue {
        let progress = self.progress();
        if progress >= 1.0 {
            return self.end.clone();
        }
        let eased = self.slot.timing.sample(progress);
        registry
            .get(self.property)
            .and_then(|r| r.interpolate(&self.start, &self.end, eased))
            .unwrap_or_else(|| snap(&self.start, &self.end, eased))
    }

    /// Redirects the transition towards `end`.
    ///
    /// The current value becomes the new start and the local clock restarts,
    /// so the output does not jump.
    pub fn retarget(
        &mut self,
        end: ErasedValue,
        slot: TransitionSlot,
        now: f64,
        registry: &PropertyRegistry,
    ) {
        self.start = self.value(registry);
        self.end = end;
        self.slot = slot;
        self.elapsed = 0.0;
        self.last_tick = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimingFunction;
    use understory_property::{Property, PropertyMetadataBuilder};

    fn setup() -> (PropertyRegistry, Property<f32>) {
        let mut registry = PropertyRegistry::new();
        let width = registry.register(
            "width",
            PropertyMetadataBuilder::new(0.0_f32).animatable().build(),
        );
        (registry, width)
    }

    fn slot(duration: f32) -> TransitionSlot {
        TransitionSlot {
            duration,
            delay: 0.0,
            timing: TimingFunction::Linear,
            play_state: PlayState::Running,
        }
    }

    fn value(state: &TransitionState, registry: &PropertyRegistry) -> f32 {
        *state.value(registry).downcast_ref::<f32>().unwrap()
    }

    #[test]
    fn runs_linearly_and_ends_exactly() {
        let (registry, width) = setup();
        let mut state = TransitionState::new(
            width.id(),
            ErasedValue::new(0.0_f32),
            ErasedValue::new(100.0_f32),
            slot(1.0),
            10.0,
        );
        assert_eq!(value(&state, &registry), 0.0);
        state.tick(10.25, slot(1.0));
        assert_eq!(value(&state, &registry), 25.0);
        state.tick(11.5, slot(1.0));
        assert!(state.is_finished());
        assert_eq!(value(&state, &registry), 100.0);
    }

    #[test]
    fn delay_holds_the_start_value() {
        let (registry, width) = setup();
        let delayed = TransitionSlot {
            delay: 0.5,
            ..slot(1.0)
        };
        let mut state = TransitionState::new(
            width.id(),
            ErasedValue::new(0.0_f32),
            ErasedValue::new(10.0_f32),
            delayed,
            0.0,
        );
        state.tick(0.25, delayed);
        assert_eq!(value(&state, &registry), 0.0);
        state.tick(1.0, delayed);
        assert_eq!(value(&state, &registry), 5.0);
    }

    #[test]
    fn negative_delay_starts_part_way() {
        let (registry, width) = setup();
        let early = TransitionSlot {
            delay: -0.5,
            ..slot(1.0)
        };
        let state = TransitionState::new(
            width.id(),
            ErasedValue::new(0.0_f32),
            ErasedValue::new(10.0_f32),
            early,
            0.0,
        );
        assert_eq!(value(&state, &registry), 5.0);
    }

    #[test]
    fn paused_freezes_the_clock() {
        let (registry, width) = setup();
        let paused = TransitionSlot {
            play_state: PlayState::Paused,
            ..slot(1.0)
        };
        let mut state = TransitionState::new(
            width.id(),
            ErasedValue::new(0.0_f32),
            ErasedValue::new(100.0_f32),
            slot(1.0),
            0.0,
        );
        state.tick(0.5, paused);
        assert_eq!(value(&state, &registry), 50.0);
        state.tick(5.0, slot(1.0));
        assert_eq!(value(&state, &registry), 50.0);
        state.tick(5.25, slot(1.0));
        assert_eq!(value(&state, &registry), 75.0);
    }

    #[test]
    fn retarget_is_continuous() {
        let (registry, width) = setup();
        let mut state = TransitionState::new(
            width.id(),
            ErasedValue::new(0.0_f32),
            ErasedValue::new(100.0_f32),
            slot(1.0),
            0.0,
        );
        state.tick(0.3, slot(1.0));
        let before = value(&state, &registry);
        state.retarget(ErasedValue::new(50.0_f32), slot(1.0), 0.3, &registry);
        assert_eq!(value(&state, &registry), before);
        state.tick(1.5, slot(1.0));
        assert!(state.is_finished());
        assert_eq!(value(&state, &registry), 50.0);
    }
}
