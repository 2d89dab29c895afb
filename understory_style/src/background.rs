// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background layers.

use smallvec::SmallVec;
use understory_property::{ValueList, iteration_count};

use crate::length::Position;
use crate::node_style::NodeStyle;
use crate::properties::StyleProperties;
use crate::values::{BackgroundRepeat, BackgroundSize, ImageSource};

/// One background layer, assembled from the co-varying background lists.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundLayer {
    /// The layer's image.
    pub image: ImageSource,
    /// Placement of the image.
    pub position: Position,
    /// Size of the image.
    pub size: BackgroundSize,
    /// Horizontal tiling.
    pub repeat_x: BackgroundRepeat,
    /// Vertical tiling.
    pub repeat_y: BackgroundRepeat,
}

/// The background layers of an element, first layer on top.
///
/// `background-image` drives the layer count; every other background list is
/// cycled to that count, so shorter lists repeat.
///
/// ```rust
/// use understory_motion::ManualClock;
/// use understory_style::{BackgroundLayers, Declaration, NoReferences, StyleEngine};
///
/// let mut engine = StyleEngine::builder().build();
/// let node = engine
///     .insert(
///         None,
///         vec![
///             Declaration::new("background-image", "a.png, b.png, c.png"),
///             Declaration::new("background-position", "left, right"),
///         ],
///     )
///     .unwrap();
/// engine.resolve(&ManualClock::new(), &NoReferences);
///
/// let layers = BackgroundLayers::resolve(engine.style(node).unwrap(), engine.properties());
/// assert_eq!(layers.len(), 3);
/// assert_eq!(layers[2].position, layers[0].position);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundLayers {
    layers: SmallVec<[BackgroundLayer; 1]>,
    images: ValueList<ImageSource>,
}

impl BackgroundLayers {
    /// Aligns the background lists of a resolved style.
    #[must_use]
    pub fn resolve(style: &NodeStyle, props: &StyleProperties) -> Self {
        let images = style.get(props.background_image).clone();
        let positions = style.get(props.background_position);
        let sizes = style.get(props.background_size);
        let repeat_x = style.get(props.background_repeat_x);
        let repeat_y = style.get(props.background_repeat_y);

        let layers = (0..iteration_count(images.len()))
            .map(|i| BackgroundLayer {
                image: images.cycled(i).cloned().unwrap_or_default(),
                position: positions.cycled(i).copied().unwrap_or(Position::TOP_LEFT),
                size: sizes.cycled(i).copied().unwrap_or_default(),
                repeat_x: repeat_x.cycled(i).copied().unwrap_or_default(),
                repeat_y: repeat_y.cycled(i).copied().unwrap_or_default(),
            })
            .collect();
        Self { layers, images }
    }

    /// Returns `true` if the image list is the same allocation as `other`'s.
    ///
    /// Consumers use this to skip rebuilding layers whose source did not
    /// change between passes.
    #[must_use]
    pub fn same_images(&self, other: &Self) -> bool {
        self.images.ptr_eq(&other.images)
    }
}

impl core::ops::Deref for BackgroundLayers {
    type Target = [BackgroundLayer];

    fn deref(&self) -> &[BackgroundLayer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::Length;
    use crate::{Declaration, NoReferences, StyleEngine};
    use alloc::vec;
    use understory_motion::ManualClock;

    fn layers(decls: alloc::vec::Vec<Declaration>) -> BackgroundLayers {
        let mut engine = StyleEngine::builder().build();
        let node = engine.insert(None, decls).unwrap();
        engine.resolve(&ManualClock::new(), &NoReferences);
        BackgroundLayers::resolve(engine.style(node).unwrap(), engine.properties())
    }

    #[test]
    fn no_images_is_one_default_layer() {
        let layers = layers(vec![]);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].image, ImageSource::None);
        assert_eq!(layers[0].position, Position::TOP_LEFT);
        assert_eq!(layers[0].repeat_x, BackgroundRepeat::Repeat);
    }

    #[test]
    fn shorter_lists_cycle() {
        let layers = layers(vec![
            Declaration::new("background-image", "a.png, b.png, c.png"),
            Declaration::new("background-size", "cover, 10px 20px"),
            Declaration::new("background-repeat-x", "no-repeat"),
        ]);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[1].image, ImageSource::Url("b.png".into()));
        assert_eq!(layers[2].size, BackgroundSize::Cover);
        assert_eq!(
            layers[1].size,
            BackgroundSize::Explicit(Length::Px(10.0), Length::Px(20.0))
        );
        assert!(layers.iter().all(|l| l.repeat_x == BackgroundRepeat::NoRepeat));
        assert!(layers.iter().all(|l| l.repeat_y == BackgroundRepeat::Repeat));
    }

    #[test]
    fn unchanged_passes_keep_image_identity() {
        let mut engine = StyleEngine::builder().build();
        let node = engine
            .insert(None, vec![Declaration::new("background-image", "a.png")])
            .unwrap();
        let clock = ManualClock::new();
        engine.resolve(&clock, &NoReferences);
        let first = BackgroundLayers::resolve(engine.style(node).unwrap(), engine.properties());
        engine.resolve(&clock, &NoReferences);
        let second = BackgroundLayers::resolve(engine.style(node).unwrap(), engine.properties());
        assert!(first.same_images(&second));
    }
}
