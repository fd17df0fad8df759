//! Spec layer: turn the user's field spec into compiled matchers.
//!
//! A spec maps a field name to a matcher source. String sources become
//! prefix-anchored patterns; every other JSON value is kept as a literal.
//! The split is decided once here, so matching never inspects types again.

pub mod compile;
pub mod matcher;

pub use compile::{CompiledSpec, SpecField, compile};
pub use matcher::{MatcherValue, Pattern};
