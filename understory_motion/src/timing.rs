// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing functions.

use alloc::string::ToString;
use understory_property::{ConversionError, FromRaw, RawValue, split_top_level};

/// Where the jump of a [`TimingFunction::Steps`] function happens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StepPosition {
    /// The first step happens at the start of the interval.
    Start,
    /// The last step happens at the end of the interval.
    #[default]
    End,
}

/// Maps linear progress onto eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimingFunction {
    /// Identity.
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1)`.
    #[default]
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// A cubic Bézier curve through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
    CubicBezier(f32, f32, f32, f32),
    /// A staircase with the given number of steps.
    Steps(u32, StepPosition),
}

impl TimingFunction {
    /// Returns eased progress for linear progress `t`.
    ///
    /// `t` is clamped to `0.0..=1.0`. Bézier curves may overshoot outside that
    /// range in their output when `y1`/`y2` do.
    #[must_use]
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::Ease => bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier(x1, y1, x2, y2) => bezier(x1, y1, x2, y2, t),
            Self::Steps(count, position) => steps(count.max(1), position, t),
        }
    }
}

fn steps(count: u32, position: StepPosition, t: f32) -> f32 {
    let n = count as f32;
    let stepped = match position {
        StepPosition::Start => libm::ceilf(t * n),
        StepPosition::End => libm::floorf(t * n),
    };
    (stepped / n).clamp(0.0, 1.0)
}

/// Solves the curve for `x == t` and returns `y`.
fn bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let curve_x = |s: f32| component(x1, x2, s);
    let slope_x = |s: f32| {
        let u = 1.0 - s;
        3.0 * u * u * x1 + 6.0 * u * s * (x2 - x1) + 3.0 * s * s * (1.0 - x2)
    };

    let mut s = t;
    for _ in 0..8 {
        let error = curve_x(s) - t;
        if libm::fabsf(error) < 1e-6 {
            return component(y1, y2, s);
        }
        let slope = slope_x(s);
        if libm::fabsf(slope) < 1e-6 {
            break;
        }
        s -= error / slope;
    }

    // Newton did not converge; bisect.
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = t;
    for _ in 0..32 {
        let x = curve_x(s);
        if libm::fabsf(x - t) < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    component(y1, y2, s)
}

/// One coordinate of a unit Bézier with control points `p1` and `p2`.
#[inline]
fn component(p1: f32, p2: f32, s: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

impl FromRaw for TimingFunction {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        let text = raw.to_keyword()?;
        let lower = text.to_ascii_lowercase();
        let malformed = || ConversionError::Malformed {
            input: text.to_string(),
            expected: "a timing function",
        };

        if let Some(args) = function_args(&lower, "cubic-bezier") {
            let mut values = [0.0_f32; 4];
            let parts = split_top_level(args, ',');
            if parts.len() != 4 {
                return Err(malformed());
            }
            for (slot, part) in values.iter_mut().zip(parts.iter()) {
                *slot = part
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(malformed)?;
            }
            let [x1, y1, x2, y2] = values;
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return Err(ConversionError::OutOfRange {
                    expected: "cubic-bezier x coordinates within 0..=1",
                });
            }
            return Ok(Self::CubicBezier(x1, y1, x2, y2));
        }

        if let Some(args) = function_args(&lower, "steps") {
            let parts = split_top_level(args, ',');
            let count: u32 = parts
                .first()
                .and_then(|n| n.parse().ok())
                .ok_or_else(malformed)?;
            if count == 0 {
                return Err(ConversionError::OutOfRange {
                    expected: "a positive step count",
                });
            }
            let position = match parts.get(1).copied() {
                None | Some("end" | "jump-end") => StepPosition::End,
                Some("start" | "jump-start") => StepPosition::Start,
                Some(_) => return Err(malformed()),
            };
            if parts.len() > 2 {
                return Err(malformed());
            }
            return Ok(Self::Steps(count, position));
        }

        match lower.as_str() {
            "linear" => Ok(Self::Linear),
            "ease" => Ok(Self::Ease),
            "ease-in" => Ok(Self::EaseIn),
            "ease-out" => Ok(Self::EaseOut),
            "ease-in-out" => Ok(Self::EaseInOut),
            "step-start" => Ok(Self::Steps(1, StepPosition::Start)),
            "step-end" => Ok(Self::Steps(1, StepPosition::End)),
            _ => Err(ConversionError::UnknownKeyword {
                keyword: text.to_string(),
            }),
        }
    }
}

/// Returns the argument text of `name(...)`.
fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}
