// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The concrete style property table.

use alloc::string::String;
use peniko::Mix;
use understory_motion::{
    Direction, FillMode, IterationCount, PlayState, TimingFunction, TransitionProperty,
};
use understory_property::{
    Affects, ConversionError, FromRaw, Property, PropertyMetadata, PropertyMetadataBuilder,
    PropertyRegistry, RawValue, ValueList, delay, duration, percentage,
};

use crate::color::ColorValue;
use crate::length::{Length, Position};
use crate::values::{
    self, BackgroundRepeat, BackgroundSize, BoxShadow, FontStyle, FontWeight, ImageSource,
    PointerEvents, PositionType, Rotate, Scale, TextAlign,
};

/// The registered style properties and a typed handle for each.
///
/// The registry is built once and never mutated afterwards. With the `std`
/// feature, [`StyleProperties::global`] holds a process-wide instance.
///
/// ```rust
/// use understory_style::StyleProperties;
///
/// let props = StyleProperties::new();
/// assert_eq!(props.registry().lookup("zIndex"), Ok(props.z_index.id()));
/// assert_eq!(props.registry().lookup("line-clamp"), Ok(props.max_lines.id()));
/// assert!(props.registry().inherits(props.color.id()));
/// assert!(!props.registry().is_animatable(props.z_index.id()));
/// ```
#[derive(Debug)]
pub struct StyleProperties {
    registry: PropertyRegistry,

    /// `opacity`, a fraction clamped to `0..=1`.
    pub opacity: Property<f32>,
    /// `z-index`.
    pub z_index: Property<i32>,
    /// `visibility`; `true` is visible.
    pub visibility: Property<bool>,
    /// `position`.
    pub position: Property<PositionType>,
    /// `pointer-events`.
    pub pointer_events: Property<PointerEvents>,

    /// `color`, the text color and the target of `currentColor`.
    pub color: Property<ColorValue>,
    /// `background-color`.
    pub background_color: Property<ColorValue>,
    /// `border-top-color`.
    pub border_top_color: Property<ColorValue>,
    /// `border-right-color`.
    pub border_right_color: Property<ColorValue>,
    /// `border-bottom-color`.
    pub border_bottom_color: Property<ColorValue>,
    /// `border-left-color`.
    pub border_left_color: Property<ColorValue>,
    /// `border-top-left-radius`.
    pub border_top_left_radius: Property<Length>,
    /// `border-top-right-radius`.
    pub border_top_right_radius: Property<Length>,
    /// `border-bottom-right-radius`.
    pub border_bottom_right_radius: Property<Length>,
    /// `border-bottom-left-radius`.
    pub border_bottom_left_radius: Property<Length>,

    /// `translate`.
    pub translate: Property<Position>,
    /// `scale`.
    pub scale: Property<Scale>,
    /// `rotate`.
    pub rotate: Property<Rotate>,
    /// `transform-origin`.
    pub transform_origin: Property<Position>,

    /// `font-size`; computed to pixels.
    pub font_size: Property<Length>,
    /// `font-weight`.
    pub font_weight: Property<FontWeight>,
    /// `font-style` (alias `text-decoration`).
    pub font_style: Property<FontStyle>,
    /// `line-height`; `normal` is [`Length::Auto`].
    pub line_height: Property<Length>,
    /// `letter-spacing`.
    pub letter_spacing: Property<Length>,
    /// `word-spacing`.
    pub word_spacing: Property<Length>,
    /// `text-align`.
    pub text_align: Property<TextAlign>,
    /// `text-wrap` (alias `white-space`); `true` wraps.
    pub text_wrap: Property<bool>,
    /// `max-lines` (alias `line-clamp`).
    pub max_lines: Property<i32>,
    /// `text-stroke-width`.
    pub text_stroke_width: Property<Length>,
    /// `text-stroke-color`.
    pub text_stroke_color: Property<ColorValue>,
    /// `content`.
    pub content: Property<Option<String>>,

    /// `box-shadow`.
    pub box_shadow: Property<ValueList<BoxShadow>>,
    /// `background-image`, the primary list of background layers.
    pub background_image: Property<ValueList<ImageSource>>,
    /// `background-position`.
    pub background_position: Property<ValueList<Position>>,
    /// `background-size`.
    pub background_size: Property<ValueList<BackgroundSize>>,
    /// `background-repeat-x`.
    pub background_repeat_x: Property<ValueList<BackgroundRepeat>>,
    /// `background-repeat-y`.
    pub background_repeat_y: Property<ValueList<BackgroundRepeat>>,
    /// `background-blend-mode`.
    pub background_blend_mode: Property<Mix>,

    /// `transition-property`.
    pub transition_property: Property<ValueList<TransitionProperty>>,
    /// `transition-duration`, in seconds.
    pub transition_duration: Property<ValueList<f32>>,
    /// `transition-timing-function`.
    pub transition_timing_function: Property<ValueList<TimingFunction>>,
    /// `transition-delay`, in seconds.
    pub transition_delay: Property<ValueList<f32>>,
    /// `transition-play-state`.
    pub transition_play_state: Property<ValueList<PlayState>>,

    /// `animation-name`.
    pub animation_name: Property<ValueList<String>>,
    /// `animation-duration`, in seconds.
    pub animation_duration: Property<ValueList<f32>>,
    /// `animation-delay`, in seconds.
    pub animation_delay: Property<ValueList<f32>>,
    /// `animation-timing-function`.
    pub animation_timing_function: Property<ValueList<TimingFunction>>,
    /// `animation-iteration-count`.
    pub animation_iteration_count: Property<ValueList<IterationCount>>,
    /// `animation-direction`.
    pub animation_direction: Property<ValueList<Direction>>,
    /// `animation-fill-mode`.
    pub animation_fill_mode: Property<ValueList<FillMode>>,
    /// `animation-play-state`.
    pub animation_play_state: Property<ValueList<PlayState>>,
}

impl StyleProperties {
    /// Builds the table.
    #[must_use]
    pub fn new() -> Self {
        let mut r = PropertyRegistry::new();
        let layout = Affects::LAYOUT;
        let paint = Affects::PAINT;
        let text = Affects::TEXT | Affects::LAYOUT;

        let opacity = r.register(
            "opacity",
            PropertyMetadataBuilder::new(1.0_f32)
                .converter(percentage)
                .coerce(|v: f32| v.clamp(0.0, 1.0))
                .animatable()
                .affects(Affects::COMPOSITE)
                .build(),
        );
        let z_index = r.register(
            "z-index",
            PropertyMetadataBuilder::new(0_i32)
                .parsed()
                .affects(Affects::COMPOSITE)
                .build(),
        );
        let visibility = r.register(
            "visibility",
            PropertyMetadataBuilder::new(true)
                .converter(values::visibility)
                .inherits(true)
                .affects(paint)
                .build(),
        );
        let position = r.register(
            "position",
            PropertyMetadataBuilder::new(PositionType::Relative)
                .parsed()
                .affects(layout)
                .build(),
        );
        let pointer_events = r.register(
            "pointer-events",
            PropertyMetadataBuilder::new(PointerEvents::Auto)
                .parsed()
                .inherits(true)
                .build(),
        );

        let color = r.register(
            "color",
            PropertyMetadataBuilder::new(ColorValue::BLACK)
                .parsed()
                .inherits(true)
                .animatable()
                .affects(paint | Affects::TEXT)
                .build(),
        );
        let background_color =
            r.register("background-color", color_metadata(ColorValue::TRANSPARENT));
        let border_top_color =
            r.register("border-top-color", color_metadata(ColorValue::CurrentColor));
        let border_right_color =
            r.register("border-right-color", color_metadata(ColorValue::CurrentColor));
        let border_bottom_color =
            r.register("border-bottom-color", color_metadata(ColorValue::CurrentColor));
        let border_left_color =
            r.register("border-left-color", color_metadata(ColorValue::CurrentColor));
        let border_top_left_radius = r.register("border-top-left-radius", radius_metadata());
        let border_top_right_radius = r.register("border-top-right-radius", radius_metadata());
        let border_bottom_right_radius =
            r.register("border-bottom-right-radius", radius_metadata());
        let border_bottom_left_radius = r.register("border-bottom-left-radius", radius_metadata());

        let translate = r.register(
            "translate",
            PropertyMetadataBuilder::new(Position::ZERO)
                .parsed()
                .animatable()
                .affects(Affects::COMPOSITE)
                .build(),
        );
        let scale = r.register(
            "scale",
            PropertyMetadataBuilder::new(Scale::IDENTITY)
                .parsed()
                .animatable()
                .affects(Affects::COMPOSITE)
                .build(),
        );
        let rotate = r.register(
            "rotate",
            PropertyMetadataBuilder::new(Rotate::default())
                .parsed()
                .animatable()
                .affects(Affects::COMPOSITE)
                .build(),
        );
        let transform_origin = r.register(
            "transform-origin",
            PropertyMetadataBuilder::new(Position::CENTER)
                .parsed()
                .animatable()
                .affects(Affects::COMPOSITE)
                .build(),
        );

        let font_size = r.register(
            "font-size",
            PropertyMetadataBuilder::new(Length::Rem(1.0))
                .converter(font_size)
                .inherits(true)
                .animatable()
                .affects(text)
                .build(),
        );
        let font_weight = r.register(
            "font-weight",
            PropertyMetadataBuilder::new(FontWeight::NORMAL)
                .parsed()
                .inherits(true)
                .affects(text)
                .build(),
        );
        let font_style = r.register(
            "font-style",
            PropertyMetadataBuilder::new(FontStyle::empty())
                .parsed()
                .inherits(true)
                .affects(text)
                .build(),
        );
        r.alias("text-decoration", font_style.id());
        let line_height = r.register(
            "line-height",
            PropertyMetadataBuilder::new(Length::Auto)
                .converter(values::line_height)
                .inherits(true)
                .animatable()
                .affects(text)
                .build(),
        );
        let letter_spacing = r.register("letter-spacing", spacing_metadata());
        let word_spacing = r.register("word-spacing", spacing_metadata());
        let text_align = r.register(
            "text-align",
            PropertyMetadataBuilder::new(TextAlign::Start)
                .parsed()
                .inherits(true)
                .affects(text)
                .build(),
        );
        let text_wrap = r.register(
            "text-wrap",
            PropertyMetadataBuilder::new(true)
                .converter(values::text_wrap)
                .inherits(true)
                .affects(text)
                .build(),
        );
        r.alias("white-space", text_wrap.id());
        let max_lines = r.register(
            "max-lines",
            PropertyMetadataBuilder::new(i32::from(i16::MAX))
                .converter(max_lines)
                .inherits(true)
                .affects(text)
                .build(),
        );
        r.alias("line-clamp", max_lines.id());
        let text_stroke_width = r.register(
            "text-stroke-width",
            PropertyMetadataBuilder::new(Length::ZERO)
                .parsed()
                .inherits(true)
                .animatable()
                .affects(paint)
                .build(),
        );
        let text_stroke_color = r.register(
            "text-stroke-color",
            PropertyMetadataBuilder::new(ColorValue::CurrentColor)
                .parsed()
                .inherits(true)
                .animatable()
                .affects(paint)
                .build(),
        );
        let content = r.register(
            "content",
            PropertyMetadataBuilder::new(None)
                .converter(values::content)
                .affects(text)
                .build(),
        );

        let box_shadow = r.register(
            "box-shadow",
            PropertyMetadataBuilder::list(BoxShadow::NONE, BoxShadow::from_raw)
                .animatable()
                .affects(paint)
                .build(),
        );
        let background_image =
            r.register_list("background-image", ImageSource::None, ImageSource::from_raw, paint);
        let background_position = r.register(
            "background-position",
            PropertyMetadataBuilder::list(Position::TOP_LEFT, Position::from_raw)
                .animatable()
                .affects(paint)
                .build(),
        );
        let background_size = r.register(
            "background-size",
            PropertyMetadataBuilder::list(BackgroundSize::Auto, BackgroundSize::from_raw)
                .animatable()
                .affects(paint)
                .build(),
        );
        let background_repeat_x = r.register_list(
            "background-repeat-x",
            BackgroundRepeat::Repeat,
            BackgroundRepeat::from_raw,
            paint,
        );
        let background_repeat_y = r.register_list(
            "background-repeat-y",
            BackgroundRepeat::Repeat,
            BackgroundRepeat::from_raw,
            paint,
        );
        let background_blend_mode = r.register(
            "background-blend-mode",
            PropertyMetadataBuilder::new(Mix::Normal)
                .converter(values::blend_mode)
                .affects(paint)
                .build(),
        );

        let none = Affects::empty();
        let transition_property = r.register_list(
            "transition-property",
            TransitionProperty::All,
            TransitionProperty::from_raw,
            none,
        );
        let transition_duration = r.register_list("transition-duration", 0.0, duration, none);
        let transition_timing_function = r.register_list(
            "transition-timing-function",
            TimingFunction::Ease,
            TimingFunction::from_raw,
            none,
        );
        let transition_delay = r.register_list("transition-delay", 0.0, delay, none);
        let transition_play_state = r.register_list(
            "transition-play-state",
            PlayState::Running,
            PlayState::from_raw,
            none,
        );

        let animation_name =
            r.register_list("animation-name", String::from("none"), String::from_raw, none);
        let animation_duration = r.register_list("animation-duration", 0.0, duration, none);
        let animation_delay = r.register_list("animation-delay", 0.0, delay, none);
        let animation_timing_function = r.register_list(
            "animation-timing-function",
            TimingFunction::Ease,
            TimingFunction::from_raw,
            none,
        );
        let animation_iteration_count = r.register_list(
            "animation-iteration-count",
            IterationCount::default(),
            IterationCount::from_raw,
            none,
        );
        let animation_direction = r.register_list(
            "animation-direction",
            Direction::Normal,
            Direction::from_raw,
            none,
        );
        let animation_fill_mode =
            r.register_list("animation-fill-mode", FillMode::None, FillMode::from_raw, none);
        let animation_play_state = r.register_list(
            "animation-play-state",
            PlayState::Running,
            PlayState::from_raw,
            none,
        );

        Self {
            registry: r,
            opacity,
            z_index,
            visibility,
            position,
            pointer_events,
            color,
            background_color,
            border_top_color,
            border_right_color,
            border_bottom_color,
            border_left_color,
            border_top_left_radius,
            border_top_right_radius,
            border_bottom_right_radius,
            border_bottom_left_radius,
            translate,
            scale,
            rotate,
            transform_origin,
            font_size,
            font_weight,
            font_style,
            line_height,
            letter_spacing,
            word_spacing,
            text_align,
            text_wrap,
            max_lines,
            text_stroke_width,
            text_stroke_color,
            content,
            box_shadow,
            background_image,
            background_position,
            background_size,
            background_repeat_x,
            background_repeat_y,
            background_blend_mode,
            transition_property,
            transition_duration,
            transition_timing_function,
            transition_delay,
            transition_play_state,
            animation_name,
            animation_duration,
            animation_delay,
            animation_timing_function,
            animation_iteration_count,
            animation_direction,
            animation_fill_mode,
            animation_play_state,
        }
    }

    /// The process-wide table, built on first use.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn global() -> alloc::sync::Arc<Self> {
        static GLOBAL: std::sync::OnceLock<alloc::sync::Arc<StyleProperties>> =
            std::sync::OnceLock::new();
        alloc::sync::Arc::clone(GLOBAL.get_or_init(|| alloc::sync::Arc::new(Self::new())))
    }

    /// The underlying registry.
    #[must_use]
    #[inline]
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Color properties that may hold `currentColor`, in resolution order
    /// after `color` itself.
    #[must_use]
    pub fn current_color_dependents(&self) -> [Property<ColorValue>; 6] {
        [
            self.background_color,
            self.border_top_color,
            self.border_right_color,
            self.border_bottom_color,
            self.border_left_color,
            self.text_stroke_color,
        ]
    }

    /// The four corner radii, top-left first, clockwise.
    #[must_use]
    pub fn radii(&self) -> [Property<Length>; 4] {
        [
            self.border_top_left_radius,
            self.border_top_right_radius,
            self.border_bottom_right_radius,
            self.border_bottom_left_radius,
        ]
    }
}

impl Default for StyleProperties {
    fn default() -> Self {
        Self::new()
    }
}

fn color_metadata(
    default_value: ColorValue,
) -> PropertyMetadata<ColorValue> {
    PropertyMetadataBuilder::new(default_value)
        .parsed()
        .animatable()
        .affects(Affects::PAINT)
        .build()
}

fn radius_metadata() -> PropertyMetadata<Length> {
    PropertyMetadataBuilder::new(Length::ZERO)
        .parsed()
        .animatable()
        .affects(Affects::PAINT)
        .build()
}

fn spacing_metadata() -> PropertyMetadata<Length> {
    PropertyMetadataBuilder::new(Length::ZERO)
        .converter(|raw: &RawValue| match raw.as_str() {
            Some(word) if word.eq_ignore_ascii_case("normal") => Ok(Length::ZERO),
            _ => Length::from_raw(raw),
        })
        .inherits(true)
        .animatable()
        .affects(Affects::TEXT | Affects::LAYOUT)
        .build()
}

/// `default` and `medium` select the base size.
fn font_size(raw: &RawValue) -> Result<Length, ConversionError> {
    if let Some(word) = raw.as_str()
        && (word.eq_ignore_ascii_case("default") || word.eq_ignore_ascii_case("medium"))
    {
        return Ok(Length::Rem(1.0));
    }
    let size = Length::from_raw(raw)?;
    match size {
        Length::Auto => Err(ConversionError::UnexpectedType {
            expected: "a font size",
        }),
        Length::Px(v) | Length::Percent(v) | Length::Em(v) | Length::Rem(v) if v < 0.0 => {
            Err(ConversionError::OutOfRange {
                expected: "a non-negative font size",
            })
        }
        other => Ok(other),
    }
}

/// `none` lifts the limit.
fn max_lines(raw: &RawValue) -> Result<i32, ConversionError> {
    match raw.as_str() {
        Some(word) if word.eq_ignore_ascii_case("none") => Ok(i32::from(i16::MAX)),
        _ => match i32::from_raw(raw)? {
            lines if lines < 0 => Err(ConversionError::OutOfRange {
                expected: "a non-negative line count",
            }),
            lines => Ok(lines),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_property::ErasedValue;

    #[test]
    fn names_and_aliases_resolve() {
        let props = StyleProperties::new();
        let r = props.registry();
        assert_eq!(r.lookup("backgroundColor"), Ok(props.background_color.id()));
        assert_eq!(r.lookup("white-space"), Ok(props.text_wrap.id()));
        assert_eq!(r.lookup("lineClamp"), Ok(props.max_lines.id()));
        assert_eq!(r.lookup("TEXT_DECORATION"), Ok(props.font_style.id()));
        assert_eq!(r.name(props.transition_duration.id()), Some("transition-duration"));
        assert!(r.lookup("cursor-color").is_err());
    }

    #[test]
    fn flags_match_the_table() {
        let props = StyleProperties::new();
        let r = props.registry();
        assert!(r.inherits(props.font_size.id()));
        assert!(r.inherits(props.text_wrap.id()));
        assert!(!r.inherits(props.opacity.id()));
        assert!(!r.inherits(props.background_image.id()));
        assert!(r.is_animatable(props.opacity.id()));
        assert!(r.is_animatable(props.box_shadow.id()));
        assert!(!r.is_animatable(props.visibility.id()));
        assert!(!r.is_animatable(props.transition_duration.id()));
        assert_eq!(r.affects(props.opacity.id()), Affects::COMPOSITE);
        assert!(r.affects(props.font_size.id()).contains(Affects::LAYOUT));
    }

    #[test]
    fn opacity_normalizes_and_clamps() {
        let props = StyleProperties::new();
        let opacity = props.registry().get(props.opacity.id()).unwrap();
        assert_eq!(
            opacity.convert(&RawValue::from("50%")),
            Ok(ErasedValue::new(0.5_f32))
        );
        assert_eq!(
            opacity.convert(&RawValue::from(3.0)),
            Ok(ErasedValue::new(1.0_f32))
        );
    }

    #[test]
    fn converter_edge_cases() {
        let props = StyleProperties::new();
        let r = props.registry();
        let convert = |id, raw: &str| r.get(id).unwrap().convert(&RawValue::from(raw));
        assert!(convert(props.transition_duration.id(), "1s, -2s").is_err());
        assert_eq!(
            convert(props.transition_delay.id(), "-0.5s"),
            Ok(ErasedValue::new(ValueList::single(-0.5_f32)))
        );
        assert!(convert(props.font_size.id(), "-2px").is_err());
        assert_eq!(
            convert(props.font_size.id(), "medium"),
            Ok(ErasedValue::new(Length::Rem(1.0)))
        );
        assert_eq!(
            convert(props.max_lines.id(), "none"),
            Ok(ErasedValue::new(i32::from(i16::MAX)))
        );
        assert_eq!(
            convert(props.letter_spacing.id(), "normal"),
            Ok(ErasedValue::new(Length::ZERO))
        );
    }

    #[test]
    fn defaults_cover_every_property() {
        let props = StyleProperties::new();
        let defaults = props.registry().defaults();
        assert_eq!(defaults.len(), props.registry().len());
        assert_eq!(
            defaults[props.animation_name.id().slot()],
            ErasedValue::new(ValueList::single(String::from("none")))
        );
        assert_eq!(
            defaults[props.border_left_color.id().slot()],
            ErasedValue::new(ColorValue::CurrentColor)
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn global_is_shared() {
        let a = StyleProperties::global();
        let b = StyleProperties::global();
        assert!(alloc::sync::Arc::ptr_eq(&a, &b));
    }
}
