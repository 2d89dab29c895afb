// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The resolution pass driver.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use understory_motion::{
    AnimationConfig, Clock, KeyframeLibrary, KeyframeSet, MotionContext, TransitionConfig,
};
use understory_property::{ErasedValue, PropertyRegistry};

use crate::cascade::cascade;
use crate::computed::{ComputeContext, ReferenceDimensions};
use crate::declaration::Declaration;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::node_style::{NodeStyle, typed};
use crate::properties::StyleProperties;
use crate::tree::{NodeId, StyleTree};

/// Builder for [`StyleEngine`].
///
/// ```rust
/// use understory_style::StyleEngine;
///
/// let engine = StyleEngine::builder()
///     .base_font_size(14.0)
///     .report_unknown_once(false)
///     .build();
/// assert_eq!(engine.base_font_size(), 14.0);
/// ```
#[derive(Debug)]
pub struct StyleEngineBuilder {
    properties: Option<Arc<StyleProperties>>,
    keyframes: KeyframeLibrary,
    base_font_size: f32,
    report_unknown_once: bool,
}

impl Default for StyleEngineBuilder {
    fn default() -> Self {
        Self {
            properties: None,
            keyframes: KeyframeLibrary::new(),
            base_font_size: 16.0,
            report_unknown_once: true,
        }
    }
}

impl StyleEngineBuilder {
    /// Creates a builder with the defaults: a 16px base font size and unknown
    /// property names reported once.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the size `rem` and the initial `font-size` refer to.
    #[must_use]
    pub fn base_font_size(mut self, size: f32) -> Self {
        self.base_font_size = size;
        self
    }

    /// Sets whether an unknown property name is reported once per engine
    /// instead of once per element.
    #[must_use]
    pub fn report_unknown_once(mut self, once: bool) -> Self {
        self.report_unknown_once = once;
        self
    }

    /// Uses a specific property table instead of the shared one.
    #[must_use]
    pub fn properties(mut self, properties: Arc<StyleProperties>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Starts with a keyframe library.
    #[must_use]
    pub fn keyframes(mut self, keyframes: KeyframeLibrary) -> Self {
        self.keyframes = keyframes;
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build(self) -> StyleEngine {
        let props = self.properties.unwrap_or_else(default_properties);
        StyleEngine {
            props,
            tree: StyleTree::new(),
            keyframes: self.keyframes,
            diagnostics: Diagnostics::new(self.report_unknown_once),
            base_font_size: self.base_font_size,
            passes: 0,
        }
    }
}

#[cfg(feature = "std")]
fn default_properties() -> Arc<StyleProperties> {
    StyleProperties::global()
}

#[cfg(not(feature = "std"))]
fn default_properties() -> Arc<StyleProperties> {
    Arc::new(StyleProperties::new())
}

/// Resolves the styles of an element tree, one pass at a time.
///
/// Each [`resolve`](Self::resolve) call reads the clock once and walks the
/// tree parents first. For every element it runs the cascade, computes
/// contextual values, advances transitions and animations, and commits the
/// result into the element's [`NodeStyle`].
///
/// ```rust
/// use understory_motion::ManualClock;
/// use understory_style::{Declaration, NoReferences, StyleEngine};
///
/// let mut engine = StyleEngine::builder().build();
/// let props = engine.properties().clone();
/// let clock = ManualClock::new();
///
/// let node = engine
///     .insert(
///         None,
///         vec![
///             Declaration::new("opacity", 0),
///             Declaration::new("transition-property", "opacity"),
///             Declaration::new("transition-duration", 1),
///             Declaration::new("transition-timing-function", "linear"),
///         ],
///     )
///     .unwrap();
/// engine.resolve(&clock, &NoReferences);
/// assert_eq!(*engine.style(node).unwrap().get(props.opacity), 0.0);
///
/// engine.set_declarations(
///     node,
///     vec![
///         Declaration::new("opacity", 1),
///         Declaration::new("transition-property", "opacity"),
///         Declaration::new("transition-duration", 1),
///         Declaration::new("transition-timing-function", "linear"),
///     ],
/// );
/// engine.resolve(&clock, &NoReferences);
/// clock.set(0.5);
/// engine.resolve(&clock, &NoReferences);
/// assert_eq!(*engine.style(node).unwrap().get(props.opacity), 0.5);
/// clock.set(1.0);
/// engine.resolve(&clock, &NoReferences);
/// assert_eq!(*engine.style(node).unwrap().get(props.opacity), 1.0);
/// ```
#[derive(Debug)]
pub struct StyleEngine {
    props: Arc<StyleProperties>,
    tree: StyleTree,
    keyframes: KeyframeLibrary,
    diagnostics: Diagnostics,
    base_font_size: f32,
    passes: u64,
}

impl Default for StyleEngine {
    fn default() -> Self {
        StyleEngineBuilder::new().build()
    }
}

impl StyleEngine {
    /// Creates an engine with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> StyleEngineBuilder {
        StyleEngineBuilder::new()
    }

    /// The property table.
    #[must_use]
    pub fn properties(&self) -> &Arc<StyleProperties> {
        &self.props
    }

    /// The property registry.
    #[must_use]
    pub fn registry(&self) -> &PropertyRegistry {
        self.props.registry()
    }

    /// The base font size.
    #[must_use]
    pub fn base_font_size(&self) -> f32 {
        self.base_font_size
    }

    /// The element tree.
    #[must_use]
    pub fn tree(&self) -> &StyleTree {
        &self.tree
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Adds an element with its matched declarations, in any order.
    ///
    /// Its style holds the initial values until the next pass. Returns `None`
    /// if `parent` is no longer alive.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        declarations: Vec<Declaration>,
    ) -> Option<NodeId> {
        let initial = self.props.registry().defaults();
        self.tree.insert(parent, declarations, initial)
    }

    /// Removes an element and its subtree, with all their motion state.
    ///
    /// Returns `false` if `node` is stale.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let mut stack = alloc::vec![node];
        while let Some(next) = stack.pop() {
            self.diagnostics.forget(next);
            stack.extend_from_slice(self.tree.children(next));
        }
        self.tree.remove(node)
    }

    /// Replaces an element's declarations; takes effect on the next pass.
    ///
    /// Problems recorded for the old declarations are dropped. Returns
    /// `false` if `node` is stale.
    pub fn set_declarations(&mut self, node: NodeId, declarations: Vec<Declaration>) -> bool {
        if !self.tree.set_declarations(node, declarations) {
            return false;
        }
        self.diagnostics.forget(node);
        true
    }

    /// The resolved style of an element.
    #[must_use]
    pub fn style(&self, node: NodeId) -> Option<&NodeStyle> {
        self.tree.style(node)
    }

    /// The keyframe library.
    #[must_use]
    pub fn keyframes(&self) -> &KeyframeLibrary {
        &self.keyframes
    }

    /// Mutable access to the keyframe library.
    pub fn keyframes_mut(&mut self) -> &mut KeyframeLibrary {
        &mut self.keyframes
    }

    /// Adds or replaces a named keyframe set.
    pub fn insert_keyframes(
        &mut self,
        name: impl Into<String>,
        set: KeyframeSet,
    ) -> Option<KeyframeSet> {
        self.keyframes.insert(name, set)
    }

    /// Problems recorded since the last [`take_diagnostics`](Self::take_diagnostics).
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Drains the recorded problems.
    ///
    /// A problem that persists across passes is recorded once per element,
    /// so it is not returned again until the element's declarations change.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// Returns `true` if a later pass may change some value without any
    /// declaration change, i.e. a transition or animation is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tree.elements().any(|e| e.motion.is_active())
    }

    /// Runs one resolution pass over the whole tree.
    pub fn resolve<C, R>(&mut self, clock: &C, references: &R)
    where
        C: Clock + ?Sized,
        R: ReferenceDimensions + ?Sized,
    {
        let now = clock.now();
        self.passes += 1;
        log::trace!("style pass {} at {now}s", self.passes);
        let pass = Pass {
            props: &self.props,
            keyframes: &self.keyframes,
            base_font_size: self.base_font_size,
            now,
            references,
        };
        for node in self.tree.depth_first() {
            pass.element(&mut self.tree, &mut self.diagnostics, node);
        }
    }
}

struct Pass<'a, R: ?Sized> {
    props: &'a StyleProperties,
    keyframes: &'a KeyframeLibrary,
    base_font_size: f32,
    now: f64,
    references: &'a R,
}

impl<R: ReferenceDimensions + ?Sized> Pass<'_, R> {
    fn element(&self, tree: &mut StyleTree, diagnostics: &mut Diagnostics, node: NodeId) {
        let registry = self.props.registry();
        let Some(element) = tree.get(node) else {
            return;
        };
        let parent = element
            .parent
            .and_then(|p| tree.style(p))
            .map(NodeStyle::values);
        let previous = element.resolved.then(|| element.style.values());

        let mut values = cascade(
            registry,
            &element.declarations,
            parent,
            Some(node),
            diagnostics,
        );
        ComputeContext {
            props: self.props,
            node,
            base_font_size: self.base_font_size,
            parent,
            previous,
            references: self.references,
        }
        .compute(&mut values, diagnostics);

        let transitions = transition_config(self.props, &values).unwrap_or_default();
        let animations = animation_config(self.props, &values).unwrap_or_default();

        let Some(element) = tree.get_mut(node) else {
            return;
        };
        let ctx = MotionContext {
            registry,
            keyframes: self.keyframes,
            now: self.now,
        };
        let committed = element.resolved.then(|| element.style.values());
        let animating = element
            .motion
            .step(&ctx, &transitions, &animations, committed, &mut values);
        element.style.commit(values, animating, element.parent);
        element.resolved = true;
    }
}

fn transition_config(props: &StyleProperties, values: &[ErasedValue]) -> Option<TransitionConfig> {
    Some(TransitionConfig {
        properties: typed(values, props.transition_property)?.clone(),
        durations: typed(values, props.transition_duration)?.clone(),
        delays: typed(values, props.transition_delay)?.clone(),
        timing_functions: typed(values, props.transition_timing_function)?.clone(),
        play_states: typed(values, props.transition_play_state)?.clone(),
    })
}

fn animation_config(props: &StyleProperties, values: &[ErasedValue]) -> Option<AnimationConfig> {
    Some(AnimationConfig {
        names: typed(values, props.animation_name)?.clone(),
        durations: typed(values, props.animation_duration)?.clone(),
        delays: typed(values, props.animation_delay)?.clone(),
        timing_functions: typed(values, props.animation_timing_function)?.clone(),
        iteration_counts: typed(values, props.animation_iteration_count)?.clone(),
        directions: typed(values, props.animation_direction)?.clone(),
        fill_modes: typed(values, props.animation_fill_mode)?.clone(),
        play_states: typed(values, props.animation_play_state)?.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computed::{Axis, NoReferences};
    use crate::length::Length;
    use alloc::vec;
    use understory_motion::{Keyframe, ManualClock};
    use understory_property::StyleError;

    #[test]
    fn children_inherit_from_resolved_parents() {
        let mut engine = StyleEngine::new();
        let props = engine.properties().clone();
        let root = engine
            .insert(None, vec![Declaration::new("font-size", "20px")])
            .unwrap();
        let child = engine
            .insert(Some(root), vec![Declaration::new("letter-spacing", "0.1em")])
            .unwrap();
        engine.resolve(&ManualClock::new(), &NoReferences);
        let style = engine.style(child).unwrap();
        assert_eq!(*style.get(props.font_size), Length::Px(20.0));
        assert_eq!(*style.get(props.letter_spacing), Length::Px(2.0));
        assert_eq!(style.parent(), Some(root));
    }

    #[test]
    fn references_come_from_the_layout_callback() {
        let mut engine = StyleEngine::new();
        let props = engine.properties().clone();
        let node = engine
            .insert(
                None,
                vec![Declaration::new("border-bottom-right-radius", "25%")],
            )
            .unwrap();
        let layout = move |id: NodeId, axis: Axis| {
            (id == node && axis == Axis::Horizontal).then_some(200.0_f32)
        };
        engine.resolve(&ManualClock::new(), &layout);
        assert_eq!(
            *engine.style(node).unwrap().get(props.border_bottom_right_radius),
            Length::Px(50.0)
        );
        assert!(engine.diagnostics().is_empty());
    }

    #[test]
    fn diagnostics_carry_the_node() {
        let mut engine = StyleEngine::new();
        let node = engine
            .insert(None, vec![Declaration::new("opacity", "bright")])
            .unwrap();
        engine.resolve(&ManualClock::new(), &NoReferences);
        let diagnostics = engine.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].node, Some(node));
        assert!(matches!(
            diagnostics[0].error,
            StyleError::Conversion {
                property: "opacity",
                ..
            }
        ));
        assert!(engine.diagnostics().is_empty());
    }

    #[test]
    fn animations_report_activity() {
        let mut engine = StyleEngine::new();
        let props = engine.properties().clone();
        engine.insert_keyframes(
            "fade",
            KeyframeSet::new([
                Keyframe::new(0.0).set(props.opacity, 0.0),
                Keyframe::new(1.0).set(props.opacity, 1.0),
            ]),
        );
        let node = engine
            .insert(
                None,
                vec![
                    Declaration::new("animation-name", "fade"),
                    Declaration::new("animation-duration", "2s"),
                    Declaration::new("animation-timing-function", "linear"),
                ],
            )
            .unwrap();
        let clock = ManualClock::new();
        engine.resolve(&clock, &NoReferences);
        assert!(engine.is_active());
        clock.set(1.0);
        engine.resolve(&clock, &NoReferences);
        let style = engine.style(node).unwrap();
        assert_eq!(*style.get(props.opacity), 0.5);
        assert!(style.is_animating(props.opacity.id()));

        clock.set(3.0);
        engine.resolve(&clock, &NoReferences);
        let style = engine.style(node).unwrap();
        assert_eq!(*style.get(props.opacity), 1.0);
        assert!(!style.is_animating(props.opacity.id()));
        assert!(!engine.is_active());
        assert_eq!(engine.passes(), 3);
    }

    #[test]
    fn persistent_problems_are_recorded_once() {
        let mut engine = StyleEngine::new();
        let decls = || {
            vec![
                Declaration::new("opacity", "bogus"),
                Declaration::new("color", "currentColor"),
            ]
        };
        let node = engine.insert(None, decls()).unwrap();
        let clock = ManualClock::new();
        for i in 0..1000 {
            clock.set(f64::from(i) / 60.0);
            engine.resolve(&clock, &NoReferences);
        }
        assert_eq!(engine.diagnostics().len(), 2);

        engine.set_declarations(node, decls());
        assert!(engine.diagnostics().is_empty());
        engine.resolve(&clock, &NoReferences);
        assert_eq!(engine.take_diagnostics().len(), 2);
        engine.resolve(&clock, &NoReferences);
        assert!(engine.diagnostics().is_empty());

        let child = engine
            .insert(Some(node), vec![Declaration::new("z-index", "high")])
            .unwrap();
        engine.resolve(&clock, &NoReferences);
        assert_eq!(engine.diagnostics().len(), 1);
        assert!(engine.remove(node));
        assert!(engine.diagnostics().is_empty());
        assert!(engine.diagnostics().entries().iter().all(|d| d.node != Some(child)));
    }

    #[test]
    fn removed_elements_take_their_motion_with_them() {
        let mut engine = StyleEngine::new();
        let root = engine.insert(None, Vec::new()).unwrap();
        let child = engine.insert(Some(root), Vec::new()).unwrap();
        assert!(engine.remove(root));
        assert!(engine.style(child).is_none());
        assert!(!engine.set_declarations(child, Vec::new()));
        engine.resolve(&ManualClock::new(), &NoReferences);
        assert!(engine.tree().is_empty());
    }
}
