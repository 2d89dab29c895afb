// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Style: style resolution for element trees.
//!
//! This crate turns the declarations matched to each element into resolved,
//! typed property values, once per pass:
//!
//! **Cascade → Inheritance → Computed values → Transitions and animations → Commit**
//!
//! Selector matching and layout are out of scope. Callers hand each element
//! its matched [`Declaration`]s, and supply percentage reference sizes through
//! a [`ReferenceDimensions`] implementation.
//!
//! ## Core Concepts
//!
//! ### Declarations and the cascade
//!
//! A [`Declaration`] is a property name, a raw value, a [`Specificity`], an
//! `!important` flag and a source order. For each property the winning
//! declaration is the first in precedence order whose value converts; values
//! that fail to convert are recorded in [`Diagnostics`] and skipped.
//! Undeclared inherited properties take their parent's value, everything else
//! its initial value. `inherit`, `initial` and `unset` work on any property.
//!
//! ### Computed values
//!
//! `currentColor` resolves to the element's `color`; `em` lengths resolve
//! against the element's font size and `rem` against the engine's base font
//! size. Corner radius percentages resolve against the width reported by the
//! layout collaborator.
//!
//! ### Motion
//!
//! `transition-*` and `animation-*` values drive
//! [`understory_motion`]: a changed animatable property starts a transition
//! from its previous value, and named keyframe sets override the cascade while
//! they run.
//!
//! ### Change tracking
//!
//! Every [`NodeStyle`] carries a generation. After a pass,
//! [`NodeStyle::changed_since`] lists the properties whose values changed and
//! [`NodeStyle::affected_since`] folds their invalidation flags.
//!
//! ## Example
//!
//! ```rust
//! use understory_motion::ManualClock;
//! use understory_style::{ColorValue, Declaration, Length, NoReferences, Specificity, StyleEngine};
//!
//! let mut engine = StyleEngine::builder().build();
//! let props = engine.properties().clone();
//!
//! let root = engine
//!     .insert(
//!         None,
//!         vec![
//!             Declaration::new("color", "red").with_specificity(Specificity(0, 1, 0)),
//!             Declaration::new("color", "blue").with_order(1),
//!             Declaration::new("font-size", "20px"),
//!         ],
//!     )
//!     .unwrap();
//! let child = engine
//!     .insert(Some(root), vec![Declaration::new("border-top-left-radius", "0.5em")])
//!     .unwrap();
//!
//! engine.resolve(&ManualClock::new(), &NoReferences);
//!
//! let style = engine.style(child).unwrap();
//! let red = ColorValue::Rgba(peniko::Color::from_rgba8(255, 0, 0, 255));
//! assert_eq!(*style.get(props.color), red);
//! assert_eq!(*style.get(props.border_top_color), red);
//! assert_eq!(*style.get(props.border_top_left_radius), Length::Px(10.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): a shared process-wide property table and the system clock.
//! - `libm`: floating point math for `no_std` targets.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod background;
mod cascade;
mod color;
mod computed;
mod declaration;
mod diagnostics;
mod engine;
mod length;
mod node_style;
mod properties;
mod tree;
mod values;

pub use background::{BackgroundLayer, BackgroundLayers};
pub use cascade::cascade;
pub use color::ColorValue;
pub use computed::{Axis, NoReferences, ReferenceDimensions};
pub use declaration::{Declaration, Specificity, sort_by_precedence};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use engine::{StyleEngine, StyleEngineBuilder};
pub use length::{Length, Position};
pub use node_style::NodeStyle;
pub use properties::StyleProperties;
pub use tree::{NodeId, StyleTree};
pub use values::{
    BackgroundRepeat, BackgroundSize, BoxShadow, FontStyle, FontWeight, ImageSource,
    PointerEvents, PositionType, Rotate, Scale, TextAlign, blend_mode, content, line_height,
    text_wrap, visibility,
};
