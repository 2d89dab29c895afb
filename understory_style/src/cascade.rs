// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascade resolution.
//!
//! Picks one value per property from an element's matched declarations,
//! falling back to the parent's value for inherited properties and to the
//! initial value otherwise.

use alloc::vec::Vec;
use understory_property::{
    ErasedValue, PropertyId, PropertyRegistration, PropertyRegistry, RawValue, StyleError,
};

use crate::declaration::Declaration;
use crate::diagnostics::Diagnostics;
use crate::tree::NodeId;

/// CSS-wide keywords accepted by every property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Defaulting {
    Inherit,
    Initial,
    Unset,
}

impl Defaulting {
    fn parse(raw: &RawValue) -> Option<Self> {
        let word = raw.as_str()?;
        [
            ("inherit", Self::Inherit),
            ("initial", Self::Initial),
            ("unset", Self::Unset),
        ]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(word))
        .map(|(_, keyword)| keyword)
    }
}

/// Resolves the cascaded value of every property.
///
/// `declarations` must be ordered highest precedence first (see
/// [`sort_by_precedence`](crate::sort_by_precedence)). The first declaration
/// of a property whose value converts wins; unknown names and values that
/// fail to convert are reported and skipped. `parent` holds the parent's
/// final values, indexed by property id.
///
/// The result has exactly one value per registered property.
///
/// ```rust
/// use understory_style::{Declaration, Diagnostics, StyleProperties, cascade};
///
/// let props = StyleProperties::new();
/// let mut diagnostics = Diagnostics::new(true);
/// let decls = [
///     Declaration::new("opacity", "not a number"),
///     Declaration::new("opacity", 0.25),
/// ];
/// let values = cascade(props.registry(), &decls, None, None, &mut diagnostics);
/// assert_eq!(values[props.opacity.id().slot()].downcast_ref::<f32>(), Some(&0.25));
/// assert_eq!(diagnostics.len(), 1);
/// ```
pub fn cascade(
    registry: &PropertyRegistry,
    declarations: &[Declaration],
    parent: Option<&[ErasedValue]>,
    node: Option<NodeId>,
    diagnostics: &mut Diagnostics,
) -> Vec<ErasedValue> {
    let mut decided: Vec<Option<ErasedValue>> = alloc::vec![None; registry.len()];

    for decl in declarations {
        let id = match registry.lookup(&decl.property) {
            Ok(id) => id,
            Err(err) => {
                diagnostics.report(node, err);
                continue;
            }
        };
        let Some(registration) = registry.get(id) else {
            continue;
        };
        let slot = &mut decided[id.slot()];
        if slot.is_some() {
            continue;
        }
        *slot = Some(match Defaulting::parse(&decl.value) {
            Some(Defaulting::Inherit) => parent
                .and_then(|p| p.get(id.slot()))
                .cloned()
                .unwrap_or_else(|| registration.default_value()),
            Some(Defaulting::Initial) => registration.default_value(),
            Some(Defaulting::Unset) => fallback(registration, id, parent),
            None => match registration.convert(&decl.value) {
                Ok(value) => value,
                Err(source) => {
                    diagnostics.report(
                        node,
                        StyleError::Conversion {
                            property: registration.name(),
                            source,
                        },
                    );
                    continue;
                }
            },
        });
    }

    decided
        .into_iter()
        .zip(registry.iter())
        .map(|(value, (id, registration))| {
            value.unwrap_or_else(|| fallback(registration, id, parent))
        })
        .collect()
}

/// The value of a property nothing declared: the parent's for inherited
/// properties, the initial value otherwise.
fn fallback(
    registration: &PropertyRegistration,
    id: PropertyId,
    parent: Option<&[ErasedValue]>,
) -> ErasedValue {
    if registration.inherits()
        && let Some(value) = parent.and_then(|p| p.get(id.slot()))
    {
        return value.clone();
    }
    registration.default_value()
}
