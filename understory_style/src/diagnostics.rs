// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collected resolution problems.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashSet;
use understory_property::StyleError;

use crate::tree::NodeId;

/// A recovered problem, with the element it happened on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The element being resolved, if any.
    pub node: Option<NodeId>,
    /// What went wrong.
    pub error: StyleError,
}

/// A sink for [`StyleError`]s.
///
/// Each distinct problem is recorded and logged once per element: a
/// declaration that fails on every pass shows up a single time until the
/// element is forgotten (see [`forget`](Self::forget)). Logging levels are
/// `warn` for unknown properties and cycles, `debug` for conversion failures
/// and `trace` for missing references.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    seen: HashSet<(Option<NodeId>, StyleError)>,
    seen_unknown: HashSet<String>,
    report_unknown_once: bool,
}

impl Diagnostics {
    /// Creates an empty sink.
    ///
    /// With `report_unknown_once`, each unknown property name is recorded
    /// the first time it is seen anywhere; otherwise once per element.
    #[must_use]
    pub fn new(report_unknown_once: bool) -> Self {
        Self {
            report_unknown_once,
            ..Self::default()
        }
    }

    /// Records a problem unless it was already recorded for `node`.
    pub fn report(&mut self, node: Option<NodeId>, error: StyleError) {
        if let StyleError::UnknownProperty { name } = &error
            && self.report_unknown_once
            && !self.seen_unknown.insert(name.clone())
        {
            return;
        }
        if !self.seen.insert((node, error.clone())) {
            return;
        }
        match &error {
            StyleError::UnknownProperty { .. } => log::warn!("{error}"),
            StyleError::Conversion { .. } => log::debug!("{error} (node {node:?})"),
            StyleError::MissingReference { .. } => log::trace!("{error} (node {node:?})"),
            StyleError::CycleDetected { .. } => log::warn!("{error} (node {node:?})"),
        }
        self.entries.push(Diagnostic { node, error });
    }

    /// Drops everything recorded for `node`, so its problems are reported
    /// afresh.
    ///
    /// Called when an element's declarations change or it is removed.
    pub fn forget(&mut self, node: NodeId) {
        self.seen.retain(|(seen, _)| *seen != Some(node));
        self.entries.retain(|d| d.node != Some(node));
    }

    /// The problems recorded so far.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of recorded problems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drains the recorded problems.
    ///
    /// Drained problems are not recorded again for the same element.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::StyleTree;

    fn unknown(name: &str) -> StyleError {
        StyleError::UnknownProperty { name: name.into() }
    }

    fn nodes() -> (NodeId, NodeId) {
        let mut tree = StyleTree::new();
        let a = tree.insert(None, Vec::new(), Vec::new()).unwrap();
        let b = tree.insert(None, Vec::new(), Vec::new()).unwrap();
        (a, b)
    }

    #[test]
    fn unknown_names_report_once() {
        let (a, b) = nodes();
        let mut diagnostics = Diagnostics::new(true);
        diagnostics.report(Some(a), unknown("colour"));
        diagnostics.report(Some(b), unknown("colour"));
        diagnostics.report(Some(a), unknown("widht"));
        assert_eq!(diagnostics.len(), 2);

        let drained = diagnostics.take();
        assert_eq!(drained.len(), 2);
        assert!(diagnostics.is_empty());
        diagnostics.report(None, unknown("colour"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unknown_names_per_element_when_asked() {
        let (a, b) = nodes();
        let mut diagnostics = Diagnostics::new(false);
        diagnostics.report(Some(a), unknown("colour"));
        diagnostics.report(Some(a), unknown("colour"));
        diagnostics.report(Some(b), unknown("colour"));
        diagnostics.report(Some(a), StyleError::CycleDetected { property: "color" });
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(
            diagnostics.entries()[2].error,
            StyleError::CycleDetected { property: "color" }
        );
    }

    #[test]
    fn repeated_problems_are_recorded_once_until_forgotten() {
        let (a, b) = nodes();
        let mut diagnostics = Diagnostics::new(true);
        let cycle = || StyleError::CycleDetected { property: "color" };
        for _ in 0..1000 {
            diagnostics.report(Some(a), cycle());
            diagnostics.report(Some(b), cycle());
        }
        assert_eq!(diagnostics.len(), 2);

        diagnostics.forget(a);
        assert_eq!(diagnostics.entries()[0].node, Some(b));
        diagnostics.report(Some(a), cycle());
        diagnostics.report(Some(b), cycle());
        assert_eq!(diagnostics.len(), 2);
    }
}
