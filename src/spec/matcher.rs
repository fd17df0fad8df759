use crate::Result;
use crate::error::FinderError;

use anyhow::bail;
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// A compiled pattern that only counts matches starting at the first byte of
/// the candidate. The end of the candidate is not anchored, so `MC_` matches
/// `MC_RunIISummer20`.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    re: Regex,
}

impl Pattern {
    pub fn new(field: &str, source: &str) -> Result<Self> {
        let re = match Regex::new(source) {
            Ok(re) => re,
            Err(err) => bail!(FinderError::PatternSyntax {
                field: field.to_string(),
                pattern: source.to_string(),
                reason: err.to_string(),
            }),
        };
        Ok(Self {
            source: source.to_string(),
            re,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True iff the pattern matches at offset 0.
    ///
    /// Leftmost-first search returns a match at offset 0 whenever one exists,
    /// so checking the start of the first match is equivalent to an anchored
    /// match.
    pub fn matches_prefix(&self, candidate: &str) -> bool {
        self.re.find(candidate).is_some_and(|m| m.start() == 0)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.source)
    }
}

/// One compiled spec entry.
#[derive(Debug, Clone)]
pub enum MatcherValue {
    /// Non-string spec value. Never equal to a stringified candidate.
    Literal(Value),
    /// String spec value, compiled to a prefix pattern.
    Pattern(Pattern),
}

impl MatcherValue {
    /// Compile a raw spec value for `field`.
    pub fn compile(field: &str, raw: &Value) -> Result<Self> {
        match raw {
            Value::String(source) => Ok(MatcherValue::Pattern(Pattern::new(field, source)?)),
            other => Ok(MatcherValue::Literal(other.clone())),
        }
    }

    /// Test a stringified candidate against this entry.
    ///
    /// Literals never match: candidates are always strings, and every string
    /// spec value is compiled into a pattern, so a literal is never equal to
    /// a candidate.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            MatcherValue::Pattern(p) => p.matches_prefix(candidate),
            MatcherValue::Literal(_) => false,
        }
    }
}
