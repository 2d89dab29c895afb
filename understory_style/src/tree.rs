// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element arena.

use alloc::vec::Vec;
use understory_motion::ElementMotion;
use understory_property::ErasedValue;

use crate::declaration::{Declaration, sort_by_precedence};
use crate::node_style::NodeStyle;

/// Identifier for an element in a [`StyleTree`].
///
/// A `NodeId` is a slot index plus a generation:
///
/// - On insert, a fresh slot starts at generation 1.
/// - On remove, the slot is freed and every `NodeId` pointing at it is stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new,
///   distinct `NodeId`.
///
/// Stale ids never alias a different live element because the generation must
/// match. Use [`StyleTree::is_alive`] to check liveness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }

    /// The slot generation of this id.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

#[derive(Debug)]
pub(crate) struct Element {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) style: NodeStyle,
    pub(crate) motion: ElementMotion,
    /// Set once the element has been through a pass.
    pub(crate) resolved: bool,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// A tree of elements with their declarations and resolved styles.
///
/// The tree owns every element's [`NodeStyle`] and motion state, so styles
/// and in-flight transitions live exactly as long as their element.
#[derive(Debug, Default)]
pub struct StyleTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    len: usize,
}

impl StyleTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// The parent of an element, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// The children of an element in insertion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |e| &e.children)
    }

    /// Elements without a parent, in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The declarations of an element, highest precedence first.
    #[must_use]
    pub fn declarations(&self, id: NodeId) -> Option<&[Declaration]> {
        self.get(id).map(|e| e.declarations.as_slice())
    }

    /// The resolved style of an element.
    #[must_use]
    pub fn style(&self, id: NodeId) -> Option<&NodeStyle> {
        self.get(id).map(|e| &e.style)
    }

    /// Inserts an element under `parent` (or as a root).
    ///
    /// The element's style starts at `initial` until the next pass. Returns
    /// `None` if `parent` is stale.
    pub(crate) fn insert(
        &mut self,
        parent: Option<NodeId>,
        mut declarations: Vec<Declaration>,
        initial: Vec<ErasedValue>,
    ) -> Option<NodeId> {
        if let Some(parent) = parent
            && !self.is_alive(parent)
        {
            return None;
        }
        sort_by_precedence(&mut declarations);
        let element = Element {
            parent,
            children: Vec::new(),
            declarations,
            style: NodeStyle::new(initial, parent),
            motion: ElementMotion::new(),
            resolved: false,
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.element = Some(element);
            NodeId(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).ok()?;
            self.slots.push(Slot {
                generation: 1,
                element: Some(element),
            });
            NodeId(idx, 1)
        };
        match parent.and_then(|p| self.get_mut(p)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        self.len += 1;
        Some(id)
    }

    /// Removes an element and its whole subtree.
    ///
    /// Returns `false` if `id` is stale.
    pub(crate) fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.get(id).map(|e| e.parent) else {
            return false;
        };
        match parent.and_then(|p| self.get_mut(p)) {
            Some(parent) => parent.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            let slot = &mut self.slots[next.idx()];
            if let Some(element) = slot.element.take() {
                stack.extend(element.children);
                self.free.push(next.0);
                self.len -= 1;
            }
        }
        true
    }

    /// Replaces the declarations of an element.
    ///
    /// Returns `false` if `id` is stale.
    pub(crate) fn set_declarations(
        &mut self,
        id: NodeId,
        mut declarations: Vec<Declaration>,
    ) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        sort_by_precedence(&mut declarations);
        element.declarations = declarations;
        true
    }

    /// Live elements with every parent before its children.
    #[must_use]
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len);
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    pub(crate) fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.slots.iter().filter_map(|slot| slot.element.as_ref())
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Element> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.element.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.element.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn insert(tree: &mut StyleTree, parent: Option<NodeId>) -> NodeId {
        tree.insert(parent, Vec::new(), Vec::new()).unwrap()
    }

    #[test]
    fn parents_come_before_children() {
        let mut tree = StyleTree::new();
        let root = insert(&mut tree, None);
        let a = insert(&mut tree, Some(root));
        let b = insert(&mut tree, Some(root));
        let a1 = insert(&mut tree, Some(a));
        assert_eq!(tree.depth_first(), vec![root, a, a1, b]);
        assert_eq!(tree.parent(a1), Some(a));
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn removal_takes_the_subtree_and_stales_ids() {
        let mut tree = StyleTree::new();
        let root = insert(&mut tree, None);
        let a = insert(&mut tree, Some(root));
        let a1 = insert(&mut tree, Some(a));
        assert!(tree.remove(a));
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(a1));
        assert_eq!(tree.children(root), &[] as &[NodeId]);
        assert_eq!(tree.len(), 1);
        assert!(!tree.remove(a));

        let reused = insert(&mut tree, Some(root));
        assert_ne!(reused, a);
        assert_ne!(reused, a1);
        assert!(reused.generation() > 1);
        assert!(tree.insert(Some(a), Vec::new(), Vec::new()).is_none());
    }

    #[test]
    fn declarations_are_kept_sorted() {
        let mut tree = StyleTree::new();
        let root = insert(&mut tree, None);
        assert!(tree.set_declarations(
            root,
            vec![
                Declaration::new("opacity", 0.1).with_order(1),
                Declaration::new("opacity", 0.2).with_order(2),
            ]
        ));
        let decls = tree.declarations(root).unwrap();
        assert_eq!(decls[0].source_order, 2);
    }
}
