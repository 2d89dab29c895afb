// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color values.

use alloc::string::ToString;
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use understory_property::{ConversionError, FromRaw, Interpolate, RawValue, snap};

use crate::length::narrow;

/// A declared color: a concrete color or a reference to the element's `color`.
///
/// After the computed-value pass only [`Rgba`](Self::Rgba) remains.
#[derive(Clone, Copy, Debug)]
pub enum ColorValue {
    /// A concrete sRGB color with straight alpha.
    Rgba(Color),
    /// The element's own computed `color`.
    CurrentColor,
}

impl ColorValue {
    /// Opaque black.
    pub const BLACK: Self = Self::Rgba(Color::BLACK);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::Rgba(Color::TRANSPARENT);

    /// Returns the concrete color, if resolved.
    #[must_use]
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Rgba(color) => Some(color),
            Self::CurrentColor => None,
        }
    }
}

impl PartialEq for ColorValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rgba(a), Self::Rgba(b)) => a.components == b.components,
            (Self::CurrentColor, Self::CurrentColor) => true,
            _ => false,
        }
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        Self::Rgba(color)
    }
}

impl FromRaw for ColorValue {
    /// Accepts CSS color strings, `currentColor`, and `[r, g, b]` or
    /// `[r, g, b, a]` lists with channels in `0.0..=1.0`.
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        match raw {
            RawValue::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("currentcolor") {
                    return Ok(Self::CurrentColor);
                }
                parse_color(s)
                    .map(|c| Self::Rgba(c.to_alpha_color::<Srgb>()))
                    .map_err(|_| ConversionError::Malformed {
                        input: s.to_string(),
                        expected: "a CSS color",
                    })
            }
            RawValue::List(items) if items.len() == 3 || items.len() == 4 => {
                let mut components = [1.0_f32; 4];
                for (slot, item) in components.iter_mut().zip(items) {
                    let channel = narrow(item.to_number()?);
                    if !(0.0..=1.0).contains(&channel) {
                        return Err(ConversionError::OutOfRange {
                            expected: "color channels within 0..=1",
                        });
                    }
                    *slot = channel;
                }
                Ok(Self::Rgba(Color::new(components)))
            }
            _ => Err(ConversionError::UnexpectedType {
                expected: "a color",
            }),
        }
    }
}

impl Interpolate for ColorValue {
    /// Blends per channel in the stored sRGB representation.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (Self::Rgba(a), Self::Rgba(b)) => {
                let mut components = a.components;
                for (c, target) in components.iter_mut().zip(b.components) {
                    *c += (target - *c) * t;
                }
                Self::Rgba(Color::new(components))
            }
            _ => snap(self, to, t),
        }
    }
}
