// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lengths and two-dimensional positions.

use alloc::string::ToString;
use understory_property::{
    ConversionError, FromRaw, Interpolate, RawValue, snap, split_unit, split_whitespace_top_level,
};

/// A length as declared or computed.
///
/// After the computed-value pass, font-relative units are gone: lengths are
/// [`Px`](Self::Px), [`Auto`](Self::Auto) or a [`Percent`](Self::Percent)
/// that needs a layout reference.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Length {
    /// Decided by the consumer.
    #[default]
    Auto,
    /// Absolute pixels.
    Px(f32),
    /// A fraction of a reference dimension (`"50%"` is `Percent(0.5)`).
    Percent(f32),
    /// Multiples of the element's font size.
    Em(f32),
    /// Multiples of the root font size.
    Rem(f32),
}

impl Length {
    /// Zero pixels.
    pub const ZERO: Self = Self::Px(0.0);

    /// Returns the pixel value, if absolute.
    #[must_use]
    #[inline]
    pub fn px(self) -> Option<f32> {
        match self {
            Self::Px(px) => Some(px),
            _ => None,
        }
    }

    /// Returns `true` if no reference is needed to use this length.
    #[must_use]
    #[inline]
    pub fn is_absolute(self) -> bool {
        matches!(self, Self::Px(_) | Self::Auto)
    }

    /// Replaces font-relative units with pixels.
    #[must_use]
    pub fn resolve_font_relative(self, font_size: f32, root_font_size: f32) -> Self {
        match self {
            Self::Em(em) => Self::Px(em * font_size),
            Self::Rem(rem) => Self::Px(rem * root_font_size),
            other => other,
        }
    }
}

impl FromRaw for Length {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        match raw {
            RawValue::Number(_) => Ok(Self::Px(narrow(raw.to_number()?))),
            RawValue::String(s) => parse_length(s),
            _ => Err(ConversionError::UnexpectedType {
                expected: "a length",
            }),
        }
    }
}

fn parse_length(s: &str) -> Result<Length, ConversionError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("auto") {
        return Ok(Length::Auto);
    }
    let malformed = || ConversionError::Malformed {
        input: s.to_string(),
        expected: "a length in px, %, em or rem",
    };
    let (number, unit) = split_unit(s).ok_or_else(malformed)?;
    let number = narrow(number);
    match unit.to_ascii_lowercase().as_str() {
        "" | "px" => Ok(Length::Px(number)),
        "%" => Ok(Length::Percent(number / 100.0)),
        "em" => Ok(Length::Em(number)),
        "rem" => Ok(Length::Rem(number)),
        _ => Err(malformed()),
    }
}

impl Interpolate for Length {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (*self, *to) {
            (Self::Px(a), Self::Px(b)) => Self::Px(a.interpolate(&b, t)),
            (Self::Percent(a), Self::Percent(b)) => Self::Percent(a.interpolate(&b, t)),
            (Self::Em(a), Self::Em(b)) => Self::Em(a.interpolate(&b, t)),
            (Self::Rem(a), Self::Rem(b)) => Self::Rem(a.interpolate(&b, t)),
            _ => snap(self, to, t),
        }
    }
}

/// A point given as two lengths, as used by `translate`, `transform-origin`
/// and `background-position`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// Horizontal component.
    pub x: Length,
    /// Vertical component.
    pub y: Length,
}

impl Position {
    /// `0px 0px`.
    pub const ZERO: Self = Self::new(Length::ZERO, Length::ZERO);
    /// `0% 0%`.
    pub const TOP_LEFT: Self = Self::new(Length::Percent(0.0), Length::Percent(0.0));
    /// `50% 50%`.
    pub const CENTER: Self = Self::new(Length::Percent(0.5), Length::Percent(0.5));

    /// Creates a position.
    #[must_use]
    pub const fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    /// Replaces font-relative units with pixels in both components.
    #[must_use]
    pub fn resolve_font_relative(self, font_size: f32, root_font_size: f32) -> Self {
        Self::new(
            self.x.resolve_font_relative(font_size, root_font_size),
            self.y.resolve_font_relative(font_size, root_font_size),
        )
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    X,
    Y,
    Either,
}

fn position_component(word: &str) -> Result<(Length, Axis), ConversionError> {
    let keyword = match word.to_ascii_lowercase().as_str() {
        "left" => Some((Length::Percent(0.0), Axis::X)),
        "right" => Some((Length::Percent(1.0), Axis::X)),
        "top" => Some((Length::Percent(0.0), Axis::Y)),
        "bottom" => Some((Length::Percent(1.0), Axis::Y)),
        "center" => Some((Length::Percent(0.5), Axis::Either)),
        _ => None,
    };
    match keyword {
        Some(found) => Ok(found),
        None => parse_length(word).map(|l| (l, Axis::Either)),
    }
}

impl FromRaw for Position {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        match raw {
            RawValue::Number(_) => {
                let both = Length::from_raw(raw)?;
                Ok(Self::new(both, both))
            }
            RawValue::List(items) if items.len() == 2 => Ok(Self::new(
                Length::from_raw(&items[0])?,
                Length::from_raw(&items[1])?,
            )),
            RawValue::String(s) => {
                let parts = split_whitespace_top_level(s);
                match parts.as_slice() {
                    [single] => {
                        let (length, axis) = position_component(single)?;
                        let center = Length::Percent(0.5);
                        Ok(match axis {
                            Axis::X => Self::new(length, center),
                            Axis::Y => Self::new(center, length),
                            Axis::Either => Self::new(length, length),
                        })
                    }
                    [first, second] => {
                        let (a, a_axis) = position_component(first)?;
                        let (b, b_axis) = position_component(second)?;
                        if a_axis == Axis::Y || b_axis == Axis::X {
                            Ok(Self::new(b, a))
                        } else {
                            Ok(Self::new(a, b))
                        }
                    }
                    _ => Err(ConversionError::Malformed {
                        input: s.to_string(),
                        expected: "one or two lengths",
                    }),
                }
            }
            _ => Err(ConversionError::UnexpectedType {
                expected: "a position",
            }),
        }
    }
}

impl Interpolate for Position {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self::new(self.x.interpolate(&to.x, t), self.y.interpolate(&to.y, t))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "style values are stored in single precision"
)]
pub(crate) fn narrow(value: f64) -> f32 {
    value.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(s: &str) -> Result<Length, ConversionError> {
        Length::from_raw(&RawValue::from(s))
    }

    #[test]
    fn parses_units() {
        assert_eq!(length("12px"), Ok(Length::Px(12.0)));
        assert_eq!(length("12"), Ok(Length::Px(12.0)));
        assert_eq!(length("50%"), Ok(Length::Percent(0.5)));
        assert_eq!(length("1.5em"), Ok(Length::Em(1.5)));
        assert_eq!(length("2REM"), Ok(Length::Rem(2.0)));
        assert_eq!(length("auto"), Ok(Length::Auto));
        assert_eq!(Length::from_raw(&RawValue::from(4.0)), Ok(Length::Px(4.0)));
        assert!(matches!(length("3vw"), Err(ConversionError::Malformed { .. })));
        assert!(matches!(
            Length::from_raw(&RawValue::Bool(true)),
            Err(ConversionError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn same_units_blend_mixed_units_snap() {
        let a = Length::Px(0.0);
        assert_eq!(a.interpolate(&Length::Px(10.0), 0.5), Length::Px(5.0));
        assert_eq!(a.interpolate(&Length::Percent(1.0), 0.5), a);
        assert_eq!(a.interpolate(&Length::Percent(1.0), 1.0), Length::Percent(1.0));
    }

    #[test]
    fn font_relative_resolution() {
        assert_eq!(
            Length::Em(2.0).resolve_font_relative(10.0, 16.0),
            Length::Px(20.0)
        );
        assert_eq!(
            Length::Rem(2.0).resolve_font_relative(10.0, 16.0),
            Length::Px(32.0)
        );
        assert_eq!(
            Length::Percent(0.5).resolve_font_relative(10.0, 16.0),
            Length::Percent(0.5)
        );
    }

    #[test]
    fn positions_accept_keywords_in_any_order() {
        let position = |s: &str| Position::from_raw(&RawValue::from(s)).unwrap();
        assert_eq!(position("center"), Position::CENTER);
        assert_eq!(
            position("top right"),
            Position::new(Length::Percent(1.0), Length::Percent(0.0))
        );
        assert_eq!(
            position("10px 20%"),
            Position::new(Length::Px(10.0), Length::Percent(0.2))
        );
        assert_eq!(
            position("left"),
            Position::new(Length::Percent(0.0), Length::Percent(0.5))
        );
        assert!(Position::from_raw(&RawValue::from("1px 2px 3px")).is_err());
    }
}
