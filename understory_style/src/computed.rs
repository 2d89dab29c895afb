// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computed values.
//!
//! Replaces contextual placeholders in cascaded values: `currentColor`,
//! font-relative lengths, and corner radius percentages that need a layout
//! reference. Resolving already-absolute values leaves them unchanged.

use understory_property::{ErasedValue, Property, PropertyValue, StyleError, ValueList};

use crate::color::ColorValue;
use crate::diagnostics::Diagnostics;
use crate::length::{Length, Position};
use crate::node_style::typed;
use crate::properties::StyleProperties;
use crate::tree::NodeId;

/// A layout axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Widths.
    Horizontal,
    /// Heights.
    Vertical,
}

/// The layout collaborator: reference sizes for percentage lengths.
///
/// Implemented for any `Fn(NodeId, Axis) -> Option<f32>`.
pub trait ReferenceDimensions {
    /// The size percentages on `axis` of `node` refer to, if known yet.
    fn reference_dimension(&self, node: NodeId, axis: Axis) -> Option<f32>;
}

impl<F> ReferenceDimensions for F
where
    F: Fn(NodeId, Axis) -> Option<f32>,
{
    fn reference_dimension(&self, node: NodeId, axis: Axis) -> Option<f32> {
        self(node, axis)
    }
}

/// No layout information; every reference is missing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReferences;

impl ReferenceDimensions for NoReferences {
    fn reference_dimension(&self, _: NodeId, _: Axis) -> Option<f32> {
        None
    }
}

/// Inputs of the computed-value pass for one element.
pub(crate) struct ComputeContext<'a, R: ?Sized> {
    pub(crate) props: &'a StyleProperties,
    pub(crate) node: NodeId,
    pub(crate) base_font_size: f32,
    /// Final values of the parent.
    pub(crate) parent: Option<&'a [ErasedValue]>,
    /// Values committed for this element by the previous pass.
    pub(crate) previous: Option<&'a [ErasedValue]>,
    pub(crate) references: &'a R,
}

impl<R: ReferenceDimensions + ?Sized> ComputeContext<'_, R> {
    /// Resolves `values` in place.
    pub(crate) fn compute(&self, values: &mut [ErasedValue], diagnostics: &mut Diagnostics) {
        let props = self.props;
        let font_size = self.font_size(values);
        set(values, props.font_size, Length::Px(font_size));

        let color = match get(values, props.color) {
            Some(ColorValue::CurrentColor) => {
                diagnostics.report(
                    Some(self.node),
                    StyleError::CycleDetected { property: "color" },
                );
                ColorValue::BLACK
            }
            Some(color) => color,
            None => ColorValue::BLACK,
        };
        set(values, props.color, color);
        for dependent in props.current_color_dependents() {
            if get(values, dependent) == Some(ColorValue::CurrentColor) {
                set(values, dependent, color);
            }
        }

        let root = self.base_font_size;
        for property in [
            props.letter_spacing,
            props.word_spacing,
            props.line_height,
            props.text_stroke_width,
        ] {
            update(values, property, |l| l.resolve_font_relative(font_size, root));
        }
        for property in [props.translate, props.transform_origin] {
            update(values, property, |p| p.resolve_font_relative(font_size, root));
        }
        update_list(values, props.background_position, |p: &Position| {
            p.resolve_font_relative(font_size, root)
        });

        for radius in props.radii() {
            let Some(length) = get(values, radius) else {
                continue;
            };
            let resolved = match length.resolve_font_relative(font_size, root) {
                Length::Percent(fraction) => self.resolve_percent(radius, fraction, diagnostics),
                other => other,
            };
            set(values, radius, resolved);
        }
    }

    /// The element's font size in pixels.
    ///
    /// `em` and percentages refer to the parent's size, `rem` to the base size.
    fn font_size(&self, values: &[ErasedValue]) -> f32 {
        let base = self.base_font_size;
        let parent = self
            .parent
            .and_then(|p| typed(p, self.props.font_size))
            .and_then(|l| l.px())
            .unwrap_or(base);
        match get(values, self.props.font_size) {
            Some(Length::Px(px)) => px,
            Some(Length::Em(em)) => em * parent,
            Some(Length::Percent(fraction)) => fraction * parent,
            Some(Length::Rem(rem)) => rem * base,
            Some(Length::Auto) | None => base,
        }
    }

    /// Resolves a radius percentage against the element's width.
    ///
    /// Without a reference the previously committed pixel value is held, or
    /// the percentage stays for the consumer.
    fn resolve_percent(
        &self,
        property: Property<Length>,
        fraction: f32,
        diagnostics: &mut Diagnostics,
    ) -> Length {
        if let Some(width) = self
            .references
            .reference_dimension(self.node, Axis::Horizontal)
        {
            return Length::Px(fraction * width);
        }
        let name = self
            .props
            .registry()
            .name(property.id())
            .unwrap_or("border-radius");
        diagnostics.report(
            Some(self.node),
            StyleError::MissingReference { property: name },
        );
        match self.previous.and_then(|p| typed(p, property)) {
            Some(held @ Length::Px(_)) => *held,
            _ => Length::Percent(fraction),
        }
    }
}

fn get<T: PropertyValue + Copy>(values: &[ErasedValue], property: Property<T>) -> Option<T> {
    typed(values, property).copied()
}

fn set<T: PropertyValue>(values: &mut [ErasedValue], property: Property<T>, value: T) {
    if let Some(slot) = values.get_mut(property.id().slot())
        && slot.downcast_ref::<T>() != Some(&value)
    {
        *slot = ErasedValue::new(value);
    }
}

fn update<T: PropertyValue + Copy>(
    values: &mut [ErasedValue],
    property: Property<T>,
    f: impl FnOnce(T) -> T,
) {
    if let Some(value) = get(values, property) {
        set(values, property, f(value));
    }
}

/// Maps every item; an unchanged list keeps its identity.
fn update_list<T: PropertyValue>(
    values: &mut [ErasedValue],
    property: Property<ValueList<T>>,
    f: impl Fn(&T) -> T,
) {
    let Some(list) = typed(values, property) else {
        return;
    };
    if list.iter().all(|item| f(item) == *item) {
        return;
    }
    let mapped: ValueList<T> = list.iter().map(f).collect();
    set(values, property, mapped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::cascade;
    use crate::declaration::{Declaration, sort_by_precedence};
    use alloc::vec;
    use alloc::vec::Vec;
    use peniko::Color;

    struct Fixture {
        props: StyleProperties,
        node: NodeId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut tree = crate::tree::StyleTree::new();
            let node = tree.insert(None, Vec::new(), Vec::new()).unwrap();
            Self {
                props: StyleProperties::new(),
                node,
            }
        }

        fn compute(
            &self,
            mut decls: Vec<Declaration>,
            parent: Option<&[ErasedValue]>,
            previous: Option<&[ErasedValue]>,
            references: &dyn ReferenceDimensions,
        ) -> (Vec<ErasedValue>, Diagnostics) {
            sort_by_precedence(&mut decls);
            let mut diagnostics = Diagnostics::new(true);
            let mut values = cascade(
                self.props.registry(),
                &decls,
                parent,
                Some(self.node),
                &mut diagnostics,
            );
            let cx = ComputeContext {
                props: &self.props,
                node: self.node,
                base_font_size: 16.0,
                parent,
                previous,
                references,
            };
            cx.compute(&mut values, &mut diagnostics);
            (values, diagnostics)
        }
    }

    #[test]
    fn current_color_follows_color() {
        let fx = Fixture::new();
        let (values, _) = fx.compute(
            vec![
                Declaration::new("color", "#00ff00"),
                Declaration::new("border-top-color", "currentColor"),
            ],
            None,
            None,
            &NoReferences,
        );
        let green = ColorValue::Rgba(Color::from_rgba8(0, 255, 0, 255));
        assert_eq!(get(&values, fx.props.border_top_color), Some(green));
        assert_eq!(get(&values, fx.props.text_stroke_color), Some(green));
        assert_eq!(
            get(&values, fx.props.background_color),
            Some(ColorValue::TRANSPARENT)
        );
    }

    #[test]
    fn color_referring_to_itself_is_a_cycle() {
        let fx = Fixture::new();
        let (values, diagnostics) = fx.compute(
            vec![Declaration::new("color", "currentColor")],
            None,
            None,
            &NoReferences,
        );
        assert_eq!(get(&values, fx.props.color), Some(ColorValue::BLACK));
        assert_eq!(
            diagnostics.entries()[0].error,
            StyleError::CycleDetected { property: "color" }
        );
    }

    #[test]
    fn font_sizes_resolve_against_parent_and_base() {
        let fx = Fixture::new();
        let (root, _) = fx.compute(Vec::new(), None, None, &NoReferences);
        assert_eq!(get(&root, fx.props.font_size), Some(Length::Px(16.0)));

        let (parent, _) = fx.compute(
            vec![Declaration::new("font-size", "2em")],
            Some(&root),
            None,
            &NoReferences,
        );
        assert_eq!(get(&parent, fx.props.font_size), Some(Length::Px(32.0)));

        let (child, _) = fx.compute(
            vec![
                Declaration::new("font-size", "50%"),
                Declaration::new("letter-spacing", "0.5em"),
            ],
            Some(&parent),
            None,
            &NoReferences,
        );
        assert_eq!(get(&child, fx.props.font_size), Some(Length::Px(16.0)));
        assert_eq!(get(&child, fx.props.letter_spacing), Some(Length::Px(8.0)));

        let (rem, _) = fx.compute(
            vec![Declaration::new("font-size", "2rem")],
            Some(&parent),
            None,
            &NoReferences,
        );
        assert_eq!(get(&rem, fx.props.font_size), Some(Length::Px(32.0)));

        let (inherited, _) = fx.compute(Vec::new(), Some(&parent), None, &NoReferences);
        assert_eq!(get(&inherited, fx.props.font_size), Some(Length::Px(32.0)));
    }

    #[test]
    fn radius_percentages_need_a_reference() {
        let fx = Fixture::new();
        let decls = || vec![Declaration::new("border-top-left-radius", "50%")];
        let width = |_: NodeId, axis: Axis| (axis == Axis::Horizontal).then_some(40.0_f32);
        let (resolved, diagnostics) = fx.compute(decls(), None, None, &width);
        assert_eq!(
            get(&resolved, fx.props.border_top_left_radius),
            Some(Length::Px(20.0))
        );
        assert!(diagnostics.is_empty());

        let (held, diagnostics) = fx.compute(decls(), None, Some(&resolved), &NoReferences);
        assert_eq!(
            get(&held, fx.props.border_top_left_radius),
            Some(Length::Px(20.0))
        );
        assert!(matches!(
            diagnostics.entries()[0].error,
            StyleError::MissingReference { .. }
        ));

        let (pending, _) = fx.compute(decls(), None, None, &NoReferences);
        assert_eq!(
            get(&pending, fx.props.border_top_left_radius),
            Some(Length::Percent(0.5))
        );
    }

    #[test]
    fn computing_twice_changes_nothing() {
        let fx = Fixture::new();
        let (values, _) = fx.compute(
            vec![
                Declaration::new("font-size", "1.5em"),
                Declaration::new("color", "red"),
                Declaration::new("border-left-color", "currentColor"),
                Declaration::new("background-position", "1em 2em, 10px 10px"),
            ],
            None,
            None,
            &NoReferences,
        );
        let mut again = values.clone();
        let cx = ComputeContext {
            props: &fx.props,
            node: fx.node,
            base_font_size: 16.0,
            parent: None,
            previous: Some(&values),
            references: &NoReferences,
        };
        let mut diagnostics = Diagnostics::new(true);
        cx.compute(&mut again, &mut diagnostics);
        assert_eq!(again, values);
        assert_eq!(
            typed(&values, fx.props.background_position).unwrap()[0],
            Position::new(Length::Px(24.0), Length::Px(48.0))
        );
    }
}
