// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw declared values and the conversion helpers shared by converters.
//!
//! Declarations arrive from the embedder (a scripting bridge, a stylesheet
//! parser) as loosely typed [`RawValue`]s. Converters turn them into a
//! property's value type or reject them with a [`ConversionError`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::error::ConversionError;
use crate::value::{ErasedValue, PropertyValue};

/// A loosely typed declared value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RawValue {
    /// No value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number without unit.
    Number(f64),
    /// A string literal, possibly holding a unit, keyword or comma list.
    String(String),
    /// An explicit list (e.g. from a scripting array).
    List(Vec<Self>),
    /// A structured literal already in a property's value type.
    Typed(ErasedValue),
}

impl RawValue {
    /// Wraps an already-typed value.
    #[must_use]
    pub fn typed<T: PropertyValue>(value: T) -> Self {
        Self::Typed(ErasedValue::new(value))
    }

    /// Returns the trimmed string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.trim()),
            _ => None,
        }
    }

    /// Returns the value as a number, parsing unit-less numeric strings.
    ///
    /// `NaN` and infinities are rejected, whether literal or parsed.
    pub fn to_number(&self) -> Result<f64, ConversionError> {
        let n = match self {
            Self::Number(n) => *n,
            Self::String(s) => {
                let s = s.trim();
                s.parse::<f64>().map_err(|_| ConversionError::Malformed {
                    input: s.to_string(),
                    expected: "a number",
                })?
            }
            _ => {
                return Err(ConversionError::UnexpectedType {
                    expected: "a number",
                });
            }
        };
        if !n.is_finite() {
            return Err(ConversionError::OutOfRange {
                expected: "a finite number",
            });
        }
        Ok(n)
    }

    /// Returns the keyword held by a string value.
    pub fn to_keyword(&self) -> Result<&str, ConversionError> {
        self.as_str().ok_or(ConversionError::UnexpectedType {
            expected: "a keyword",
        })
    }

    /// Splits this value into comma-list items.
    ///
    /// Explicit lists yield their elements, strings are split on top-level
    /// commas (commas inside parentheses such as `cubic-bezier(..)` stay),
    /// `Null` and blank strings yield nothing, anything else is one item.
    #[must_use]
    pub fn list_items(&self) -> SmallVec<[Self; 4]> {
        match self {
            Self::Null => SmallVec::new(),
            Self::List(items) => items.iter().cloned().collect(),
            Self::String(s) => split_top_level(s, ',')
                .into_iter()
                .map(|item| Self::String(item.to_string()))
                .collect(),
            other => smallvec::smallvec![other.clone()],
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for RawValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for RawValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// Types with a canonical conversion from [`RawValue`].
pub trait FromRaw: Sized {
    /// Converts a raw value, or explains why it cannot be converted.
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError>;
}

impl FromRaw for f32 {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        raw.to_number().map(narrow)
    }
}

impl FromRaw for f64 {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        raw.to_number()
    }
}

impl FromRaw for i32 {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        let n = raw.to_number()?;
        if libm::trunc(n) != n || n < f64::from(Self::MIN) || n > f64::from(Self::MAX) {
            return Err(ConversionError::OutOfRange {
                expected: "an integer",
            });
        }
        #[expect(clippy::cast_possible_truncation, reason = "range checked above")]
        let n = n as Self;
        Ok(n)
    }
}

impl FromRaw for bool {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        match raw {
            RawValue::Bool(b) => Ok(*b),
            other => keyword(other, &[("true", true), ("false", false)]),
        }
    }
}

impl FromRaw for String {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        match raw {
            RawValue::String(s) => Ok(s.clone()),
            RawValue::Number(n) => Ok(n.to_string()),
            _ => Err(ConversionError::UnexpectedType {
                expected: "a string",
            }),
        }
    }
}

/// Matches a keyword against a table, ignoring ASCII case.
pub fn keyword<T: Copy>(raw: &RawValue, table: &[(&str, T)]) -> Result<T, ConversionError> {
    let word = raw.to_keyword()?;
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(word))
        .map(|(_, value)| *value)
        .ok_or_else(|| ConversionError::UnknownKeyword {
            keyword: word.to_string(),
        })
}

/// Converts a fraction, normalizing percentages.
///
/// `"50%"` becomes `0.5`. Bare numbers (and unit-less strings) are taken as
/// already fractional, so `0.5` stays `0.5`.
pub fn percentage(raw: &RawValue) -> Result<f32, ConversionError> {
    if let Some(s) = raw.as_str()
        && let Some(number) = s.strip_suffix('%')
    {
        let value = RawValue::String(number.to_string()).to_number()?;
        return Ok(narrow(value / 100.0));
    }
    raw.to_number().map(narrow)
}

/// Converts a duration to seconds.
///
/// Bare numbers are seconds; strings may carry `s` or `ms`. Negative
/// durations are rejected.
pub fn duration(raw: &RawValue) -> Result<f32, ConversionError> {
    let seconds = signed_time(raw)?;
    if seconds < 0.0 {
        return Err(ConversionError::OutOfRange {
            expected: "a non-negative duration",
        });
    }
    Ok(seconds)
}

/// Converts a delay to seconds; unlike [`duration`], negative values are allowed.
pub fn delay(raw: &RawValue) -> Result<f32, ConversionError> {
    signed_time(raw)
}

fn signed_time(raw: &RawValue) -> Result<f32, ConversionError> {
    if let Some(s) = raw.as_str() {
        let (number, unit) = split_unit(s).ok_or_else(|| ConversionError::Malformed {
            input: s.to_string(),
            expected: "a time",
        })?;
        return match unit {
            "" | "s" => Ok(narrow(number)),
            "ms" => Ok(narrow(number / 1000.0)),
            _ => Err(ConversionError::Malformed {
                input: s.to_string(),
                expected: "a time in s or ms",
            }),
        };
    }
    raw.to_number().map(narrow)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "style values are stored in single precision"
)]
fn narrow(value: f64) -> f32 {
    value.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32
}

/// Splits `"12.5px"` into `(12.5, "px")`.
///
/// The exponent marker is only consumed when digits follow it, so `"2em"`
/// splits into `(2.0, "em")`.
#[must_use]
pub fn split_unit(s: &str) -> Option<(f64, &str)> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            end = exp;
        }
    }
    let number = s[..end].parse::<f64>().ok().filter(|n| n.is_finite())?;
    Some((number, s[end..].trim()))
}

/// Splits on `separator` outside of parentheses, trimming each piece.
///
/// Blank input yields no pieces.
#[must_use]
pub fn split_top_level(s: &str, separator: char) -> SmallVec<[&str; 4]> {
    let mut out = SmallVec::new();
    if s.trim().is_empty() {
        return out;
    }
    let mut depth = 0_u32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                out.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(s[start..].trim());
    out
}

/// Splits on whitespace outside of parentheses.
#[must_use]
pub fn split_whitespace_top_level(s: &str) -> SmallVec<[&str; 4]> {
    let mut out = SmallVec::new();
    let mut depth = 0_u32;
    let mut start: Option<usize> = None;
    for (i, c) in s.char_indices() {
        match c {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(begin) = start.take() {
                    out.push(&s[begin..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(begin) = start {
        out.push(&s[begin..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn numbers_from_strings_and_numbers() {
        assert_eq!(RawValue::from(2.5).to_number(), Ok(2.5));
        assert_eq!(RawValue::from(" 3 ").to_number(), Ok(3.0));
        assert!(matches!(
            RawValue::from("abc").to_number(),
            Err(ConversionError::Malformed { .. })
        ));
        assert!(matches!(
            RawValue::Bool(true).to_number(),
            Err(ConversionError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for raw in [
            RawValue::from("NaN"),
            RawValue::from("inf"),
            RawValue::from("-infinity"),
            RawValue::Number(f64::NAN),
            RawValue::Number(f64::INFINITY),
        ] {
            assert_eq!(
                raw.to_number(),
                Err(ConversionError::OutOfRange {
                    expected: "a finite number"
                }),
                "{raw:?}"
            );
        }
        assert!(f32::from_raw(&RawValue::Number(f64::NAN)).is_err());
        assert_eq!(split_unit("1e999px"), None);
        assert_eq!(f32::from_raw(&RawValue::Number(1e300)), Ok(f32::MAX));
    }

    #[test]
    fn list_items_respect_parentheses() {
        let raw = RawValue::from("cubic-bezier(0.1, 0.7, 1, 0.1), linear");
        let items = raw.list_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_str(), Some("cubic-bezier(0.1, 0.7, 1, 0.1)"));
        assert_eq!(items[1].as_str(), Some("linear"));

        assert!(RawValue::from("   ").list_items().is_empty());
        assert!(RawValue::Null.list_items().is_empty());
        assert_eq!(RawValue::from(vec![1.0, 2.0]).list_items().len(), 2);
        assert_eq!(RawValue::from(4.0).list_items().len(), 1);
    }

    #[test]
    fn percentages_normalize() {
        assert_eq!(percentage(&"50%".into()), Ok(0.5));
        assert_eq!(percentage(&0.25.into()), Ok(0.25));
        assert_eq!(percentage(&"0.75".into()), Ok(0.75));
    }

    #[test]
    fn durations_accept_units_and_reject_negatives() {
        assert_eq!(duration(&1.0.into()), Ok(1.0));
        assert_eq!(duration(&"250ms".into()), Ok(0.25));
        assert_eq!(duration(&"0.5s".into()), Ok(0.5));
        assert!(matches!(
            duration(&(-1.0).into()),
            Err(ConversionError::OutOfRange { .. })
        ));
        assert!(matches!(
            duration(&"3min".into()),
            Err(ConversionError::Malformed { .. })
        ));
        assert_eq!(delay(&"-200ms".into()), Ok(-0.2));
    }

    #[test]
    fn unit_splitting() {
        assert_eq!(split_unit("12px"), Some((12.0, "px")));
        assert_eq!(split_unit("2em"), Some((2.0, "em")));
        assert_eq!(split_unit("1e2px"), Some((100.0, "px")));
        assert_eq!(split_unit("-.5turn"), Some((-0.5, "turn")));
        assert_eq!(split_unit("px"), None);
    }

    #[test]
    fn keywords_ignore_case() {
        let table = [("visible", true), ("hidden", false)];
        assert_eq!(keyword(&"Hidden".into(), &table), Ok(false));
        assert_eq!(
            keyword(&"collapse".into(), &table),
            Err(ConversionError::UnknownKeyword {
                keyword: "collapse".into()
            })
        );
    }

    #[test]
    fn integers_must_be_integral() {
        assert_eq!(i32::from_raw(&3.0.into()), Ok(3));
        assert!(i32::from_raw(&3.5.into()).is_err());
        assert_eq!(bool::from_raw(&"TRUE".into()), Ok(true));
    }

    #[test]
    fn whitespace_split_keeps_functions_whole() {
        let parts = split_whitespace_top_level("2px 4px rgba(0, 0, 0, 0.5) inset");
        assert_eq!(parts.as_slice(), &["2px", "4px", "rgba(0, 0, 0, 0.5)", "inset"]);
    }
}
