// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element motion driver.
//!
//! [`ElementMotion`] owns the transitions and animations of one element and
//! runs them once per pass. It works on dense, registry-indexed value slices
//! and never looks at concrete property types.

use smallvec::SmallVec;
use understory_property::{ErasedValue, PropertyId, PropertyRegistry};

use crate::animation::AnimationState;
use crate::config::{AnimationConfig, AnimationSpec, TransitionConfig};
use crate::keyframes::KeyframeLibrary;
use crate::transition::TransitionState;

/// Shared inputs of one pass.
#[derive(Clone, Copy, Debug)]
pub struct MotionContext<'a> {
    /// The property registry.
    pub registry: &'a PropertyRegistry,
    /// Named keyframe timelines.
    pub keyframes: &'a KeyframeLibrary,
    /// The pass time, read once from the clock.
    pub now: f64,
}

/// Properties whose value is currently moving.
pub type Animating = SmallVec<[PropertyId; 4]>;

/// Transitions and animations of one element.
#[derive(Clone, Debug, Default)]
pub struct ElementMotion {
    transitions: SmallVec<[TransitionState; 2]>,
    animations: SmallVec<[AnimationState; 1]>,
    /// Properties overridden by an animation in the previous pass.
    animated: SmallVec<[PropertyId; 4]>,
}

impl ElementMotion {
    /// Creates an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The in-flight transitions.
    #[must_use]
    pub fn transitions(&self) -> &[TransitionState] {
        &self.transitions
    }

    /// The animations configured on the element, including finished ones.
    #[must_use]
    pub fn animations(&self) -> &[AnimationState] {
        &self.animations
    }

    /// Returns `true` if a later pass may produce different values without
    /// any declaration change.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.transitions.is_empty() || self.animations.iter().any(AnimationState::is_active)
    }

    /// Runs one pass.
    ///
    /// `values` holds the element's computed targets, indexed by property id;
    /// on return it holds the values to commit. `committed` is what was
    /// committed in the previous pass, or `None` for a new element (which
    /// never transitions).
    ///
    /// Animations override transitions, and a property driven by an animation
    /// does not start a new transition. Returns the properties whose value
    /// changes with time.
    pub fn step(
        &mut self,
        ctx: &MotionContext<'_>,
        transitions: &TransitionConfig,
        animations: &AnimationConfig,
        committed: Option<&[ErasedValue]>,
        values: &mut [ErasedValue],
    ) -> Animating {
        let mut animating = Animating::new();

        self.sync_animations(ctx.now, animations.specs());
        let overrides = self.sample_animations(ctx, values, &mut animating);

        self.run_transitions(ctx, transitions, committed, values, &overrides);
        for transition in &self.transitions {
            values[transition.property().slot()] = transition.value(ctx.registry);
            if !transition.is_finished() {
                push_unique(&mut animating, transition.property());
            }
        }
        self.transitions.retain(|t| !t.is_finished());

        self.animated.clear();
        for (property, value) in overrides {
            values[property.slot()] = value;
            push_unique(&mut self.animated, property);
        }

        animating
    }

    /// Keeps one state per `animation-name` entry, restarting nothing that is
    /// still listed and dropping what is no longer listed.
    fn sync_animations(&mut self, now: f64, specs: impl Iterator<Item = AnimationSpec>) {
        let mut previous = core::mem::take(&mut self.animations);
        for spec in specs {
            if let Some(index) = previous.iter().position(|a| a.is_named(&spec.name)) {
                let mut state = previous.remove(index);
                state.tick(now, spec);
                self.animations.push(state);
            } else {
                log::debug!("starting animation `{}`", spec.name);
                self.animations.push(AnimationState::new(spec, now));
            }
        }
        for dropped in previous {
            log::debug!("cancelling animation `{}`", dropped.name());
        }
    }

    /// Samples every animation; later entries override earlier ones.
    fn sample_animations(
        &self,
        ctx: &MotionContext<'_>,
        values: &[ErasedValue],
        animating: &mut Animating,
    ) -> SmallVec<[(PropertyId, ErasedValue); 4]> {
        let mut overrides: SmallVec<[(PropertyId, ErasedValue); 4]> = SmallVec::new();
        for animation in &self.animations {
            let Some(set) = ctx.keyframes.get(animation.name()) else {
                log::debug!("no keyframes named `{}`", animation.name());
                continue;
            };
            if animation.is_active() {
                for property in set.properties() {
                    push_unique(animating, property);
                }
            }
            let Some(progress) = animation.keyframe_progress() else {
                continue;
            };
            for property in set.properties() {
                let Some(base) = values.get(property.slot()) else {
                    continue;
                };
                let Some(value) =
                    set.sample(property, progress, base, animation.spec().timing, ctx.registry)
                else {
                    continue;
                };
                match overrides.iter_mut().find(|(id, _)| *id == property) {
                    Some(slot) => slot.1 = value,
                    None => overrides.push((property, value)),
                }
            }
        }
        overrides
    }

    fn run_transitions(
        &mut self,
        ctx: &MotionContext<'_>,
        config: &TransitionConfig,
        committed: Option<&[ErasedValue]>,
        values: &[ErasedValue],
        overrides: &[(PropertyId, ErasedValue)],
    ) {
        if self.transitions.is_empty() && config.durations.iter().all(|d| *d <= 0.0) {
            return;
        }
        let registry = ctx.registry;
        for property in registry.animatable() {
            let Some(target) = values.get(property.slot()) else {
                continue;
            };
            let slot = config.slot_for(property, registry);
            let existing = self.transitions.iter().position(|t| t.property() == property);

            match (existing, slot) {
                (Some(index), None) => {
                    log::trace!("transition of {property:?} cancelled");
                    self.transitions.remove(index);
                }
                (Some(index), Some(slot)) => {
                    let transition = &mut self.transitions[index];
                    transition.tick(ctx.now, slot);
                    if transition.end() != target {
                        transition.retarget(target.clone(), slot, ctx.now, registry);
                    }
                }
                (None, Some(slot)) => {
                    let Some(previous) = committed.and_then(|c| c.get(property.slot())) else {
                        continue;
                    };
                    let driven = overrides.iter().any(|(id, _)| *id == property)
                        || self.animated.contains(&property);
                    if previous != target && !driven {
                        self.transitions.push(TransitionState::new(
                            property,
                            previous.clone(),
                            target.clone(),
                            slot,
                            ctx.now,
                        ));
                    }
                }
                (None, None) => {}
            }
        }
    }
}

fn push_unique(list: &mut Animating, property: PropertyId) {
    if !list.contains(&property) {
        list.push(property);
    }
}
