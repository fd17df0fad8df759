//! Error kinds surfaced by the record finder.
//!
//! Every fallible function returns `crate::Result`, an `anyhow::Result`. The
//! kinds below sit at the root of the chain so callers can tell them apart with
//! `err.downcast_ref::<FinderError>()`. I/O failures stay `std::io::Error`
//! wrapped with the offending path as context.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinderError {
    /// The job configuration is malformed.
    Config(String),

    /// A spec value could not be compiled as a pattern.
    PatternSyntax {
        field: String,
        pattern: String,
        reason: String,
    },

    /// A record lacks the shape needed to attempt matching.
    Schema(String),

    /// A projected field is absent from a matched record.
    MissingField(String),
}

impl fmt::Display for FinderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinderError::Config(msg) => write!(f, "invalid job configuration: {}", msg),
            FinderError::PatternSyntax {
                field,
                pattern,
                reason,
            } => write!(
                f,
                "spec field '{}' has an invalid pattern {:?}: {}",
                field, pattern, reason
            ),
            FinderError::Schema(msg) => write!(f, "malformed record: {}", msg),
            FinderError::MissingField(field) => {
                write!(f, "projected field '{}' is missing from record", field)
            }
        }
    }
}

impl std::error::Error for FinderError {}
