// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Matched declarations, the input of the cascade.

use alloc::string::String;
use core::cmp::Ordering;
use understory_property::RawValue;

/// Selector specificity as an ordered triple.
///
/// The derived lexicographic ordering gives CSS-like ranking: the first
/// component (ids) outranks the second (classes and pseudoclasses), which
/// outranks the third (type tags).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

/// One declared property value, as produced by selector matching.
///
/// ```rust
/// use understory_style::{Declaration, Specificity};
///
/// let decl = Declaration::new("opacity", 0.5)
///     .with_specificity(Specificity(0, 1, 0))
///     .with_order(3)
///     .important();
/// assert!(decl.important);
/// assert_eq!(decl.source_order, 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    /// Property name as written; any registered spelling is accepted.
    pub property: String,
    /// The declared value, converted by the property's converter.
    pub value: RawValue,
    /// Specificity of the matching selector.
    pub specificity: Specificity,
    /// `!important` declarations outrank all normal ones.
    pub important: bool,
    /// Position in the style sheet; later wins among equals.
    pub source_order: u32,
}

impl Declaration {
    /// Creates a normal declaration with zero specificity and order.
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            specificity: Specificity::default(),
            important: false,
            source_order: 0,
        }
    }

    /// Sets the specificity.
    #[must_use]
    pub fn with_specificity(mut self, specificity: Specificity) -> Self {
        self.specificity = specificity;
        self
    }

    /// Sets the source order.
    #[must_use]
    pub fn with_order(mut self, source_order: u32) -> Self {
        self.source_order = source_order;
        self
    }

    /// Marks the declaration `!important`.
    #[must_use]
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    /// Compares by precedence; `Greater` means `self` wins.
    #[must_use]
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.important
            .cmp(&other.important)
            .then(self.specificity.cmp(&other.specificity))
            .then(self.source_order.cmp(&other.source_order))
    }
}

/// Sorts declarations so the highest precedence comes first.
///
/// Important before normal, then specificity descending, then source order
/// descending. The sort is stable, so exact ties keep their input order.
pub fn sort_by_precedence(declarations: &mut [Declaration]) {
    declarations.sort_by(|a, b| b.cmp_precedence(a));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn specificity_is_lexicographic() {
        assert!(Specificity(1, 0, 0) > Specificity(0, 9, 9));
        assert!(Specificity(0, 1, 0) > Specificity(0, 0, 5));
    }

    #[test]
    fn sorting_puts_winners_first() {
        let mut decls = vec![
            Declaration::new("opacity", 0.1).with_order(5),
            Declaration::new("opacity", 0.2)
                .with_specificity(Specificity(0, 1, 0))
                .with_order(1),
            Declaration::new("opacity", 0.3).important(),
            Declaration::new("opacity", 0.4).with_order(2),
        ];
        sort_by_precedence(&mut decls);
        let order: vec::Vec<_> = decls.iter().map(|d| d.value.clone()).collect();
        assert_eq!(
            order,
            vec![
                RawValue::from(0.3),
                RawValue::from(0.2),
                RawValue::from(0.1),
                RawValue::from(0.4),
            ]
        );
    }
}
