// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Nothing here is fatal. Resolution code recovers from every error locally
//! (skips the declaration, keeps the previous value, falls back to the initial
//! value) and reports it through `log` and a diagnostics sink.

use alloc::string::String;
use core::fmt;

/// A raw value could not be converted into a property's value type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConversionError {
    /// The raw value had the wrong shape (e.g. a list where a number was expected).
    UnexpectedType {
        /// What the converter accepts.
        expected: &'static str,
    },
    /// A keyword that is not part of the property's vocabulary.
    UnknownKeyword {
        /// The rejected keyword.
        keyword: String,
    },
    /// A literal that could not be parsed.
    Malformed {
        /// The rejected input.
        input: String,
        /// What the converter accepts.
        expected: &'static str,
    },
    /// A numeric value outside the accepted range (e.g. a negative duration).
    OutOfRange {
        /// Description of the accepted range.
        expected: &'static str,
    },
    /// A comma list with no items.
    Empty,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedType { expected } => write!(f, "expected {expected}"),
            Self::UnknownKeyword { keyword } => write!(f, "unknown keyword `{keyword}`"),
            Self::Malformed { input, expected } => {
                write!(f, "malformed value `{input}`, expected {expected}")
            }
            Self::OutOfRange { expected } => write!(f, "value out of range, expected {expected}"),
            Self::Empty => f.write_str("empty value list"),
        }
    }
}

impl core::error::Error for ConversionError {}

/// Errors encountered while resolving styles.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleError {
    /// A declaration named a property that is not registered.
    UnknownProperty {
        /// The name as written in the declaration.
        name: String,
    },
    /// A declared value could not be converted; the declaration was skipped.
    Conversion {
        /// Canonical name of the property.
        property: &'static str,
        /// The converter's complaint.
        source: ConversionError,
    },
    /// A relative value needs a layout reference that is not available yet.
    MissingReference {
        /// Canonical name of the property.
        property: &'static str,
    },
    /// A computed value depends on itself; the initial value was used.
    CycleDetected {
        /// Canonical name of the property.
        property: &'static str,
    },
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProperty { name } => write!(f, "unknown style property `{name}`"),
            Self::Conversion { property, source } => {
                write!(f, "invalid value for `{property}`: {source}")
            }
            Self::MissingReference { property } => {
                write!(f, "`{property}` needs a layout reference that is not available")
            }
            Self::CycleDetected { property } => {
                write!(f, "`{property}` refers to itself; using its initial value")
            }
        }
    }
}

impl core::error::Error for StyleError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Conversion { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        let err = StyleError::Conversion {
            property: "transition-duration",
            source: ConversionError::OutOfRange {
                expected: "a non-negative duration",
            },
        };
        assert_eq!(
            err.to_string(),
            "invalid value for `transition-duration`: value out of range, expected a non-negative duration"
        );
        assert_eq!(
            StyleError::UnknownProperty {
                name: "colour".into()
            }
            .to_string(),
            "unknown style property `colour`"
        );
    }

    #[test]
    fn conversion_is_the_source() {
        use core::error::Error;
        let err = StyleError::Conversion {
            property: "opacity",
            source: ConversionError::Empty,
        };
        assert!(err.source().is_some());
        assert!(StyleError::CycleDetected { property: "color" }.source().is_none());
    }
}
