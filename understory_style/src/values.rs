// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyword and composite style values.

use alloc::string::{String, ToString};
use peniko::Mix;
use understory_property::{
    ConversionError, FromRaw, Interpolate, RawValue, keyword, snap, split_unit,
    split_whitespace_top_level,
};

use crate::color::ColorValue;
use crate::length::{Length, narrow};

/// Positioning scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PositionType {
    /// In flow.
    #[default]
    Relative,
    /// Out of flow, placed against the containing block.
    Absolute,
}

impl FromRaw for PositionType {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        keyword(
            raw,
            &[("relative", Self::Relative), ("absolute", Self::Absolute)],
        )
    }
}

/// Whether an element is a target for pointer input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerEvents {
    /// Target when visible.
    #[default]
    Auto,
    /// Never a target.
    None,
    /// Target even when not visible.
    All,
}

impl FromRaw for PointerEvents {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        keyword(
            raw,
            &[("auto", Self::Auto), ("none", Self::None), ("all", Self::All)],
        )
    }
}

/// Font weight on the usual `1..=1000` scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// `400`.
    pub const NORMAL: Self = Self(400);
    /// `700`.
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl FromRaw for FontWeight {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        if let Some(word) = raw.as_str()
            && word.parse::<f64>().is_err()
        {
            return keyword(
                raw,
                &[
                    ("thin", Self(100)),
                    ("light", Self(300)),
                    ("normal", Self::NORMAL),
                    ("regular", Self::NORMAL),
                    ("medium", Self(500)),
                    ("semibold", Self(600)),
                    ("bold", Self::BOLD),
                    ("black", Self(900)),
                ],
            );
        }
        let weight = i32::from_raw(raw)?;
        u16::try_from(weight)
            .ok()
            .filter(|w| (1..=1000).contains(w))
            .map(Self)
            .ok_or(ConversionError::OutOfRange {
                expected: "a font weight within 1..=1000",
            })
    }
}

bitflags::bitflags! {
    /// Font style and decoration flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FontStyle: u8 {
        /// Italic or oblique face.
        const ITALIC        = 0b0000_0001;
        /// Underline decoration.
        const UNDERLINE     = 0b0000_0010;
        /// Line-through decoration.
        const STRIKETHROUGH = 0b0000_0100;
        /// Render as upper case.
        const UPPERCASE     = 0b0000_1000;
        /// Render as lower case.
        const LOWERCASE     = 0b0001_0000;
        /// Render as small capitals.
        const SMALLCAPS     = 0b0010_0000;
    }
}

impl FromRaw for FontStyle {
    /// Accepts `normal` or whitespace-separated flag keywords.
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        let words = raw.to_keyword()?;
        let mut style = Self::empty();
        for word in words.split_whitespace() {
            style |= keyword(
                &RawValue::from(word),
                &[
                    ("normal", Self::empty()),
                    ("italic", Self::ITALIC),
                    ("oblique", Self::ITALIC),
                    ("underline", Self::UNDERLINE),
                    ("strikethrough", Self::STRIKETHROUGH),
                    ("line-through", Self::STRIKETHROUGH),
                    ("uppercase", Self::UPPERCASE),
                    ("lowercase", Self::LOWERCASE),
                    ("smallcaps", Self::SMALLCAPS),
                    ("small-caps", Self::SMALLCAPS),
                ],
            )?;
        }
        Ok(style)
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Start edge of the line (left in left-to-right text).
    #[default]
    Start,
    /// End edge of the line.
    End,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Centered.
    Center,
    /// Stretched to both edges.
    Justify,
}

impl FromRaw for TextAlign {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        keyword(
            raw,
            &[
                ("start", Self::Start),
                ("end", Self::End),
                ("left", Self::Left),
                ("right", Self::Right),
                ("center", Self::Center),
                ("justify", Self::Justify),
            ],
        )
    }
}

/// Per-axis scale factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Horizontal factor.
    pub x: f32,
    /// Vertical factor.
    pub y: f32,
}

impl Scale {
    /// No scaling.
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FromRaw for Scale {
    /// One factor scales both axes; two give `x y`.
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        let factors = number_items(raw, "one or two scale factors")?;
        match factors.as_slice() {
            [both] => Ok(Self { x: *both, y: *both }),
            [x, y] => Ok(Self { x: *x, y: *y }),
            _ => Err(ConversionError::Malformed {
                input: describe(raw),
                expected: "one or two scale factors",
            }),
        }
    }
}

impl Interpolate for Scale {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: self.x.interpolate(&to.x, t),
            y: self.y.interpolate(&to.y, t),
        }
    }
}

/// Rotation angles around each axis, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotate {
    /// Around the horizontal axis.
    pub x: f32,
    /// Around the vertical axis.
    pub y: f32,
    /// In the plane of the screen.
    pub z: f32,
}

impl FromRaw for Rotate {
    /// One angle rotates in the plane; three give `x y z`.
    ///
    /// Angles accept `deg`, `rad` and `turn`; bare numbers are degrees.
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        let angles: smallvec::SmallVec<[f32; 3]> = match raw {
            RawValue::Number(_) => smallvec::smallvec![narrow(raw.to_number()?)],
            RawValue::List(items) => items.iter().map(angle).collect::<Result<_, _>>()?,
            RawValue::String(s) => split_whitespace_top_level(s)
                .into_iter()
                .map(|part| angle(&RawValue::from(part)))
                .collect::<Result<_, _>>()?,
            _ => {
                return Err(ConversionError::UnexpectedType {
                    expected: "an angle",
                });
            }
        };
        match angles.as_slice() {
            [z] => Ok(Self {
                x: 0.0,
                y: 0.0,
                z: *z,
            }),
            [x, y, z] => Ok(Self {
                x: *x,
                y: *y,
                z: *z,
            }),
            _ => Err(ConversionError::Malformed {
                input: describe(raw),
                expected: "one or three angles",
            }),
        }
    }
}

impl Interpolate for Rotate {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: self.x.interpolate(&to.x, t),
            y: self.y.interpolate(&to.y, t),
            z: self.z.interpolate(&to.z, t),
        }
    }
}

/// Converts an angle to degrees.
fn angle(raw: &RawValue) -> Result<f32, ConversionError> {
    let Some(s) = raw.as_str() else {
        return raw.to_number().map(narrow);
    };
    let malformed = || ConversionError::Malformed {
        input: s.to_string(),
        expected: "an angle in deg, rad or turn",
    };
    let (number, unit) = split_unit(s).ok_or_else(malformed)?;
    let degrees = match unit.to_ascii_lowercase().as_str() {
        "" | "deg" => number,
        "rad" => number.to_degrees(),
        "turn" => number * 360.0,
        "grad" => number * 0.9,
        _ => return Err(malformed()),
    };
    Ok(narrow(degrees))
}

fn number_items(
    raw: &RawValue,
    expected: &'static str,
) -> Result<smallvec::SmallVec<[f32; 3]>, ConversionError> {
    match raw {
        RawValue::Number(_) => Ok(smallvec::smallvec![narrow(raw.to_number()?)]),
        RawValue::List(items) => items.iter().map(|i| i.to_number().map(narrow)).collect(),
        RawValue::String(s) => s
            .split_whitespace()
            .map(|part| RawValue::from(part).to_number().map(narrow))
            .collect(),
        _ => Err(ConversionError::UnexpectedType { expected }),
    }
}

fn describe(raw: &RawValue) -> String {
    match raw {
        RawValue::String(s) => s.clone(),
        other => alloc::format!("{other:?}"),
    }
}

/// One entry of `box-shadow`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShadow {
    /// Horizontal offset in pixels.
    pub offset_x: f32,
    /// Vertical offset in pixels.
    pub offset_y: f32,
    /// Blur radius in pixels.
    pub blur: f32,
    /// Spread distance in pixels.
    pub spread: f32,
    /// Shadow color.
    pub color: ColorValue,
    /// Drawn inside the border box.
    pub inset: bool,
}

impl BoxShadow {
    /// An invisible shadow.
    pub const NONE: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        blur: 0.0,
        spread: 0.0,
        color: ColorValue::TRANSPARENT,
        inset: false,
    };

    /// Returns `true` if the shadow paints nothing.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for BoxShadow {
    fn default() -> Self {
        Self::NONE
    }
}

impl FromRaw for BoxShadow {
    /// Parses `[inset] x y [blur [spread]] [color]` in any order of the
    /// color and `inset` keyword; `none` is the invisible shadow.
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        let text = raw.to_keyword()?;
        if text.eq_ignore_ascii_case("none") {
            return Ok(Self::NONE);
        }
        let malformed = || ConversionError::Malformed {
            input: text.to_string(),
            expected: "a box shadow",
        };
        let mut shadow = Self {
            color: ColorValue::CurrentColor,
            ..Self::NONE
        };
        let mut lengths: smallvec::SmallVec<[f32; 4]> = smallvec::SmallVec::new();
        let mut color = None;
        for part in split_whitespace_top_level(text) {
            if part.eq_ignore_ascii_case("inset") {
                shadow.inset = true;
            } else if let Ok(length) = Length::from_raw(&RawValue::from(part)) {
                let px = length.px().ok_or_else(malformed)?;
                lengths.push(px);
            } else if color.is_none() {
                color = Some(ColorValue::from_raw(&RawValue::from(part))?);
            } else {
                return Err(malformed());
            }
        }
        match lengths.as_slice() {
            [x, y] => (shadow.offset_x, shadow.offset_y) = (*x, *y),
            [x, y, blur] => {
                (shadow.offset_x, shadow.offset_y, shadow.blur) = (*x, *y, *blur);
            }
            [x, y, blur, spread] => {
                (shadow.offset_x, shadow.offset_y, shadow.blur, shadow.spread) =
                    (*x, *y, *blur, *spread);
            }
            _ => return Err(malformed()),
        }
        if shadow.blur < 0.0 {
            return Err(ConversionError::OutOfRange {
                expected: "a non-negative blur radius",
            });
        }
        if let Some(color) = color {
            shadow.color = color;
        }
        Ok(shadow)
    }
}

impl Interpolate for BoxShadow {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        if self.inset != to.inset {
            return snap(self, to, t);
        }
        Self {
            offset_x: self.offset_x.interpolate(&to.offset_x, t),
            offset_y: self.offset_y.interpolate(&to.offset_y, t),
            blur: self.blur.interpolate(&to.blur, t).max(0.0),
            spread: self.spread.interpolate(&to.spread, t),
            color: self.color.interpolate(&to.color, t),
            inset: self.inset,
        }
    }
}

/// An image reference of a background layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// No image; the layer paints nothing.
    #[default]
    None,
    /// An image loaded by the embedder.
    Url(String),
}

impl FromRaw for ImageSource {
    /// Accepts `none`, `url(..)` (optionally quoted) and bare references.
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        let text = raw.to_keyword()?;
        if text.is_empty() || text.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        let inner = text
            .strip_prefix("url(")
            .and_then(|rest| rest.strip_suffix(')'))
            .map(str::trim)
            .unwrap_or(text);
        let unquoted = inner
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
            .unwrap_or(inner);
        Ok(Self::Url(unquoted.to_string()))
    }
}

/// Size of a background layer's image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BackgroundSize {
    /// The image's intrinsic size.
    #[default]
    Auto,
    /// Scaled to cover the whole area.
    Cover,
    /// Scaled to fit inside the area.
    Contain,
    /// Explicit width and height.
    Explicit(Length, Length),
}

impl FromRaw for BackgroundSize {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        if let Some(text) = raw.as_str() {
            if text.eq_ignore_ascii_case("cover") {
                return Ok(Self::Cover);
            }
            if text.eq_ignore_ascii_case("contain") {
                return Ok(Self::Contain);
            }
            let parts = split_whitespace_top_level(text);
            return match parts.as_slice() {
                [single] if single.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
                [single] => {
                    let width = Length::from_raw(&RawValue::from(*single))?;
                    Ok(Self::Explicit(width, Length::Auto))
                }
                [width, height] => Ok(Self::Explicit(
                    Length::from_raw(&RawValue::from(*width))?,
                    Length::from_raw(&RawValue::from(*height))?,
                )),
                _ => Err(ConversionError::Malformed {
                    input: text.to_string(),
                    expected: "a background size",
                }),
            };
        }
        let both = Length::from_raw(raw)?;
        Ok(Self::Explicit(both, both))
    }
}

impl Interpolate for BackgroundSize {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (Self::Explicit(w0, h0), Self::Explicit(w1, h1)) => {
                Self::Explicit(w0.interpolate(w1, t), h0.interpolate(h1, t))
            }
            _ => snap(self, to, t),
        }
    }
}

/// Tiling of a background layer along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackgroundRepeat {
    /// Tiled, clipped at the edges.
    #[default]
    Repeat,
    /// Drawn once.
    NoRepeat,
    /// Tiled without clipping, extra space distributed between tiles.
    Space,
    /// Tiled without clipping, tiles rescaled to fit.
    Round,
}

impl FromRaw for BackgroundRepeat {
    fn from_raw(raw: &RawValue) -> Result<Self, ConversionError> {
        match raw {
            RawValue::Bool(true) => Ok(Self::Repeat),
            RawValue::Bool(false) => Ok(Self::NoRepeat),
            other => keyword(
                other,
                &[
                    ("repeat", Self::Repeat),
                    ("no-repeat", Self::NoRepeat),
                    ("space", Self::Space),
                    ("round", Self::Round),
                ],
            ),
        }
    }
}

/// Converts a `background-blend-mode` keyword.
pub fn blend_mode(raw: &RawValue) -> Result<Mix, ConversionError> {
    keyword(
        raw,
        &[
            ("normal", Mix::Normal),
            ("multiply", Mix::Multiply),
            ("screen", Mix::Screen),
            ("overlay", Mix::Overlay),
            ("darken", Mix::Darken),
            ("lighten", Mix::Lighten),
            ("color-dodge", Mix::ColorDodge),
            ("color-burn", Mix::ColorBurn),
            ("hard-light", Mix::HardLight),
            ("soft-light", Mix::SoftLight),
            ("difference", Mix::Difference),
            ("exclusion", Mix::Exclusion),
            ("hue", Mix::Hue),
            ("saturation", Mix::Saturation),
            ("color", Mix::Color),
            ("luminosity", Mix::Luminosity),
        ],
    )
}

/// Converts a `visibility` keyword.
pub fn visibility(raw: &RawValue) -> Result<bool, ConversionError> {
    match raw {
        RawValue::Bool(b) => Ok(*b),
        other => keyword(other, &[("visible", true), ("hidden", false)]),
    }
}

/// Converts a `text-wrap` / `white-space` keyword.
pub fn text_wrap(raw: &RawValue) -> Result<bool, ConversionError> {
    match raw {
        RawValue::Bool(b) => Ok(*b),
        other => keyword(
            other,
            &[
                ("wrap", true),
                ("normal", true),
                ("pre-wrap", true),
                ("nowrap", false),
                ("pre", false),
            ],
        ),
    }
}

/// Converts generated text content; `none` clears it.
pub fn content(raw: &RawValue) -> Result<Option<String>, ConversionError> {
    match raw {
        RawValue::Null => Ok(None),
        RawValue::String(s) if s.trim().eq_ignore_ascii_case("none") => Ok(None),
        other => String::from_raw(other).map(Some),
    }
}

/// Converts a `line-height`; `normal` is [`Length::Auto`] and bare numbers
/// are multiples of the font size.
pub fn line_height(raw: &RawValue) -> Result<Length, ConversionError> {
    match raw {
        RawValue::Number(_) => Ok(Length::Em(narrow(raw.to_number()?))),
        RawValue::String(s) if s.trim().eq_ignore_ascii_case("normal") => Ok(Length::Auto),
        RawValue::String(s) if s.trim().parse::<f64>().is_ok() => {
            Ok(Length::Em(narrow(raw.to_number()?)))
        }
        other => Length::from_raw(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::Color;

    #[test]
    fn font_weight_keywords_and_numbers() {
        assert_eq!(FontWeight::from_raw(&"bold".into()), Ok(FontWeight::BOLD));
        assert_eq!(FontWeight::from_raw(&600.0.into()), Ok(FontWeight(600)));
        assert_eq!(FontWeight::from_raw(&"300".into()), Ok(FontWeight(300)));
        assert!(FontWeight::from_raw(&0.0.into()).is_err());
        assert!(FontWeight::from_raw(&"heavy-ish".into()).is_err());
    }

    #[test]
    fn font_style_flags_combine() {
        assert_eq!(FontStyle::from_raw(&"normal".into()), Ok(FontStyle::empty()));
        assert_eq!(
            FontStyle::from_raw(&"italic underline".into()),
            Ok(FontStyle::ITALIC | FontStyle::UNDERLINE)
        );
        assert!(FontStyle::from_raw(&"wavy".into()).is_err());
    }

    #[test]
    fn scale_and_rotate() {
        assert_eq!(Scale::from_raw(&2.0.into()), Ok(Scale { x: 2.0, y: 2.0 }));
        assert_eq!(Scale::from_raw(&"1 0.5".into()), Ok(Scale { x: 1.0, y: 0.5 }));
        assert_eq!(
            Rotate::from_raw(&"0.25turn".into()),
            Ok(Rotate {
                x: 0.0,
                y: 0.0,
                z: 90.0
            })
        );
        assert_eq!(
            Rotate::from_raw(&"10deg 20 30deg".into()),
            Ok(Rotate {
                x: 10.0,
                y: 20.0,
                z: 30.0
            })
        );
        assert!(Rotate::from_raw(&"1deg 2deg".into()).is_err());
    }

    #[test]
    fn box_shadow_parts() {
        let shadow = BoxShadow::from_raw(&"2px 4px 6px rgba(0, 0, 0, 0.5) inset".into()).unwrap();
        assert_eq!(shadow.offset_x, 2.0);
        assert_eq!(shadow.offset_y, 4.0);
        assert_eq!(shadow.blur, 6.0);
        assert_eq!(shadow.spread, 0.0);
        assert!(shadow.inset);
        assert_eq!(
            shadow.color,
            ColorValue::Rgba(Color::new([0.0, 0.0, 0.0, 0.5]))
        );

        let plain = BoxShadow::from_raw(&"1px 1px".into()).unwrap();
        assert_eq!(plain.color, ColorValue::CurrentColor);
        assert!(BoxShadow::from_raw(&"none".into()).unwrap().is_none());
        assert!(BoxShadow::from_raw(&"1px".into()).is_err());
        assert!(BoxShadow::from_raw(&"1px 1px -2px".into()).is_err());
    }

    #[test]
    fn image_sources() {
        assert_eq!(
            ImageSource::from_raw(&"url(\"a.png\")".into()),
            Ok(ImageSource::Url("a.png".into()))
        );
        assert_eq!(
            ImageSource::from_raw(&"b.png".into()),
            Ok(ImageSource::Url("b.png".into()))
        );
        assert_eq!(ImageSource::from_raw(&"none".into()), Ok(ImageSource::None));
    }

    #[test]
    fn background_sizes() {
        assert_eq!(BackgroundSize::from_raw(&"cover".into()), Ok(BackgroundSize::Cover));
        assert_eq!(BackgroundSize::from_raw(&"auto".into()), Ok(BackgroundSize::Auto));
        assert_eq!(
            BackgroundSize::from_raw(&"50% 10px".into()),
            Ok(BackgroundSize::Explicit(
                Length::Percent(0.5),
                Length::Px(10.0)
            ))
        );
        assert_eq!(
            BackgroundSize::from_raw(&20.0.into()),
            Ok(BackgroundSize::Explicit(Length::Px(20.0), Length::Px(20.0)))
        );
    }

    #[test]
    fn keyword_converters() {
        assert_eq!(visibility(&"hidden".into()), Ok(false));
        assert_eq!(text_wrap(&"nowrap".into()), Ok(false));
        assert_eq!(text_wrap(&"normal".into()), Ok(true));
        assert_eq!(blend_mode(&"multiply".into()), Ok(Mix::Multiply));
        assert_eq!(content(&"none".into()), Ok(None));
        assert_eq!(content(&"hi".into()), Ok(Some("hi".into())));
        assert_eq!(line_height(&1.5.into()), Ok(Length::Em(1.5)));
        assert_eq!(line_height(&"normal".into()), Ok(Length::Auto));
        assert_eq!(line_height(&"20px".into()), Ok(Length::Px(20.0)));
        assert_eq!(
            BackgroundRepeat::from_raw(&"no-repeat".into()),
            Ok(BackgroundRepeat::NoRepeat)
        );
        assert_eq!(
            BackgroundRepeat::from_raw(&RawValue::Bool(false)),
            Ok(BackgroundRepeat::NoRepeat)
        );
    }
}
