// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyframe animation playback.

use crate::config::{AnimationSpec, IterationCount, PlayState};

/// Where an animation is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationPhase {
    /// The delay has not elapsed yet.
    Pending,
    /// Inside the active interval.
    Running {
        /// Zero-based iteration.
        iteration: u64,
        /// Keyframe progress, direction applied.
        progress: f32,
    },
    /// The last iteration has ended.
    Finished {
        /// Zero-based iteration the animation ended in.
        iteration: u64,
        /// Keyframe progress at the end, direction applied.
        progress: f32,
    },
}

/// Playback state of one `animation-name` entry on one element.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    spec: AnimationSpec,
    /// Local time since the animation was created, delay included.
    elapsed: f64,
    last_tick: f64,
    current_iteration: u64,
}

impl AnimationState {
    /// Starts an animation at `now`.
    #[must_use]
    pub fn new(spec: AnimationSpec, now: f64) -> Self {
        let mut state = Self {
            spec,
            elapsed: 0.0,
            last_tick: now,
            current_iteration: 0,
        };
        state.current_iteration = state.iteration_at_elapsed();
        state
    }

    /// The keyframe set name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// The parameters in use.
    #[must_use]
    #[inline]
    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// The iteration reached at the last tick.
    #[must_use]
    #[inline]
    pub fn current_iteration(&self) -> u64 {
        self.current_iteration
    }

    /// Advances the local clock to `now` and adopts `spec`.
    ///
    /// Time passes only while the play state is running.
    pub fn tick(&mut self, now: f64, spec: AnimationSpec) {
        if self.spec.play_state == PlayState::Running && now > self.last_tick {
            self.elapsed += now - self.last_tick;
        }
        self.last_tick = now;
        self.spec = spec;
        let iteration = self.iteration_at_elapsed();
        if iteration != self.current_iteration {
            log::trace!(
                "animation `{}` entered iteration {iteration}",
                self.spec.name
            );
            self.current_iteration = iteration;
        }
    }

    fn iteration_at_elapsed(&self) -> u64 {
        match self.phase() {
            AnimationPhase::Pending => 0,
            AnimationPhase::Running { iteration, .. }
            | AnimationPhase::Finished { iteration, .. } => iteration,
        }
    }

    /// Computes the phase at the current local time.
    #[must_use]
    pub fn phase(&self) -> AnimationPhase {
        let active = self.elapsed - f64::from(self.spec.delay);
        if active < 0.0 {
            return AnimationPhase::Pending;
        }
        let duration = f64::from(self.spec.duration.max(0.0));
        let active_duration = match self.spec.iterations {
            IterationCount::Infinite if duration > 0.0 => f64::INFINITY,
            IterationCount::Infinite => 0.0,
            IterationCount::Count(count) => duration * f64::from(count.max(0.0)),
        };

        if active >= active_duration {
            let (iteration, progress) = self.end_point();
            return AnimationPhase::Finished {
                iteration,
                progress: self.spec.direction.apply(iteration, progress),
            };
        }

        let overall = active / duration;
        let whole = libm::floor(overall);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "non-negative, bounded by the iteration count"
        )]
        let iteration = whole as u64;
        #[expect(clippy::cast_possible_truncation, reason = "progress fits in f32")]
        let progress = (overall - whole) as f32;
        AnimationPhase::Running {
            iteration,
            progress: self.spec.direction.apply(iteration, progress),
        }
    }

    /// Iteration and undirected progress where a finite animation ends.
    fn end_point(&self) -> (u64, f32) {
        let count = match self.spec.iterations {
            IterationCount::Count(count) => f64::from(count.max(0.0)),
            // Zero-duration infinite animations end immediately.
            IterationCount::Infinite => return (0, 1.0),
        };
        if count == 0.0 {
            return (0, 0.0);
        }
        let whole = libm::floor(count);
        #[expect(clippy::cast_possible_truncation, reason = "non-negative iteration count")]
        let whole_iterations = whole as u64;
        if whole == count {
            (whole_iterations - 1, 1.0)
        } else {
            #[expect(clippy::cast_possible_truncation, reason = "fraction fits in f32")]
            let fraction = (count - whole) as f32;
            (whole_iterations, fraction)
        }
    }

    /// Keyframe progress to apply now, if any.
    ///
    /// Before the delay this is the start of the first iteration when the fill
    /// mode fills backwards; after the end it is the final progress when it
    /// fills forwards.
    #[must_use]
    pub fn keyframe_progress(&self) -> Option<f32> {
        match self.phase() {
            AnimationPhase::Pending => self
                .spec
                .fill
                .fills_backwards()
                .then(|| self.spec.direction.apply(0, 0.0)),
            AnimationPhase::Running { progress, .. } => Some(progress),
            AnimationPhase::Finished { progress, .. } => {
                self.spec.fill.fills_forwards().then_some(progress)
            }
        }
    }

    /// Returns `true` once a finite animation has run its course.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase(), AnimationPhase::Finished { .. })
    }

    /// Returns `true` if the output changes as time passes.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_finished()
    }

    /// Returns `true` if this state was created for an entry named `name`.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.spec.name == name
    }
}
