// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Motion: transitions and keyframe animations for style properties.
//!
//! This crate moves property values over time. It is independent of any
//! concrete property vocabulary: it works on registry-indexed
//! [`ErasedValue`](understory_property::ErasedValue) slices and interpolates
//! through the [`PropertyRegistry`](understory_property::PropertyRegistry).
//!
//! ## Core Concepts
//!
//! - [`Clock`]: the injected time source. A pass reads it once.
//! - [`TimingFunction`]: easing curves (`ease`, `cubic-bezier(..)`, `steps(..)`).
//! - [`TransitionState`]: an implicit interpolation from a property's previous
//!   value to its new target. Retargeting mid-flight starts from the current
//!   value, so there is no visual jump.
//! - [`AnimationState`] and [`KeyframeSet`]: named timelines with delay,
//!   iteration count, direction, fill mode and play state.
//! - [`ElementMotion`]: everything in motion on one element, advanced by
//!   [`ElementMotion::step`] once per pass.
//!
//! All state is a pure function of the configuration and the pass time: there
//! are no callbacks or background timers, and removing a configuration
//! cancels its state on the next pass.
//!
//! ## Example
//!
//! ```rust
//! use understory_motion::{
//!     AnimationConfig, ElementMotion, KeyframeLibrary, MotionContext, TimingFunction,
//!     TransitionConfig,
//! };
//! use understory_property::{ErasedValue, PropertyMetadataBuilder, PropertyRegistry, ValueList};
//!
//! let mut registry = PropertyRegistry::new();
//! let opacity = registry.register(
//!     "opacity",
//!     PropertyMetadataBuilder::new(1.0_f32).animatable().build(),
//! );
//! let keyframes = KeyframeLibrary::new();
//! let transitions = TransitionConfig {
//!     durations: ValueList::single(1.0),
//!     timing_functions: ValueList::single(TimingFunction::Linear),
//!     ..TransitionConfig::default()
//! };
//! let animations = AnimationConfig::default();
//!
//! let mut motion = ElementMotion::new();
//! let committed = vec![ErasedValue::new(0.0_f32)];
//! let mut values = vec![ErasedValue::new(1.0_f32)];
//!
//! let ctx = MotionContext { registry: &registry, keyframes: &keyframes, now: 0.0 };
//! motion.step(&ctx, &transitions, &animations, Some(&committed), &mut values);
//! assert_eq!(values[0].downcast_ref::<f32>(), Some(&0.0));
//!
//! let committed = values.clone();
//! let mut values = vec![ErasedValue::new(1.0_f32)];
//! let ctx = MotionContext { now: 0.5, ..ctx };
//! let animating = motion.step(&ctx, &transitions, &animations, Some(&committed), &mut values);
//! assert_eq!(values[0].downcast_ref::<f32>(), Some(&0.5));
//! assert_eq!(animating.as_slice(), &[opacity.id()]);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature adds
//! [`SystemClock`].

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod animation;
mod clock;
mod config;
mod driver;
mod keyframes;
mod timing;
mod transition;

pub use animation::{AnimationPhase, AnimationState};
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use config::{
    AnimationConfig, AnimationSpec, Direction, FillMode, IterationCount, PlayState,
    TransitionConfig, TransitionProperty, TransitionSlot,
};
pub use driver::{Animating, ElementMotion, MotionContext};
pub use keyframes::{Keyframe, KeyframeLibrary, KeyframeSet};
pub use timing::{StepPosition, TimingFunction};
pub use transition::TransitionState;
