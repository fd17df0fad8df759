use crate::Result;
use crate::error::FinderError;
use crate::spec::matcher::MatcherValue;

use anyhow::bail;
use serde_json::{Map, Value};

/// One compiled spec field.
#[derive(Debug, Clone)]
pub struct SpecField {
    /// Field name as written in the spec.
    pub name: String,
    /// Lower-cased name, compared against lower-cased output keys.
    pub key: String,
    pub matcher: MatcherValue,
}

/// The compiled field spec of one job. Fixed after construction.
#[derive(Debug, Clone, Default)]
pub struct CompiledSpec {
    fields: Vec<SpecField>,
}

impl CompiledSpec {
    /// Compile every entry of a key/value spec mapping.
    pub fn from_map(spec: &Map<String, Value>) -> Result<Self> {
        let mut fields = Vec::with_capacity(spec.len());
        for (name, raw) in spec {
            fields.push(SpecField {
                name: name.clone(),
                key: name.to_lowercase(),
                matcher: MatcherValue::compile(name, raw)?,
            });
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[SpecField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Compile a spec given as an arbitrary JSON value.
///
/// Only objects are accepted; anything else is a configuration error.
pub fn compile(spec: &Value) -> Result<CompiledSpec> {
    match spec {
        Value::Object(map) => CompiledSpec::from_map(map),
        other => bail!(FinderError::Config(format!(
            "spec must be a mapping of field names to matchers, got {}",
            other
        ))),
    }
}
