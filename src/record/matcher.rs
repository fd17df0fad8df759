use crate::Result;
use crate::error::FinderError;
use crate::record::value::stringify;
use crate::spec::{CompiledSpec, MatcherValue};

use anyhow::bail;
use serde_json::Value;

/// Only steps whose lower-cased name starts with this are inspected.
pub const STEP_PREFIX: &str = "cmsrun";

/// Check whether any spec field is satisfied by any output of any `cmsRun`
/// step of `record`.
///
/// Fields are OR-ed: one hit anywhere is enough. An empty spec never matches,
/// and neither does a record whose `steps` is absent, null or empty.
///
/// Steps are inspected lazily, so a malformed step after the first hit is
/// never looked at. A record that is not an object, or whose `steps` is not a
/// list, is rejected before any field is tried.
pub fn matches(record: &Value, spec: &CompiledSpec) -> Result<bool> {
    if spec.is_empty() {
        return Ok(false);
    }

    let steps = steps(record)?;

    for field in spec.fields() {
        for (idx, step) in steps.iter().enumerate() {
            let Some(outputs) = cmsrun_outputs(idx, step)? else {
                continue;
            };
            for (oidx, output) in outputs.iter().enumerate() {
                let Value::Object(output) = output else {
                    bail!(FinderError::Schema(format!(
                        "steps[{}].output[{}] must be an object, got {}",
                        idx,
                        oidx,
                        kind(output)
                    )));
                };
                for (key, value) in output {
                    if key.to_lowercase() == field.key && value_matches(value, &field.matcher) {
                        log::trace!("field '{}' matched on key '{}'", field.name, key);
                        return Ok(true);
                    }
                }
            }
        }
    }

    Ok(false)
}

fn value_matches(value: &Value, matcher: &MatcherValue) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|item| matcher.matches(&stringify(item))),
        scalar => matcher.matches(&stringify(scalar)),
    }
}

/// The record's step list. Absent or null `steps` is an empty list.
fn steps(record: &Value) -> Result<&[Value]> {
    let Value::Object(fields) = record else {
        bail!(FinderError::Schema(format!(
            "record must be an object, got {}",
            kind(record)
        )));
    };

    match fields.get("steps") {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(steps)) => Ok(steps.as_slice()),
        Some(other) => bail!(FinderError::Schema(format!(
            "'steps' must be a list, got {}",
            kind(other)
        ))),
    }
}

/// The `output` list of a `cmsRun` step, or `None` for any other step.
fn cmsrun_outputs(idx: usize, step: &Value) -> Result<Option<&[Value]>> {
    let Value::Object(step) = step else {
        bail!(FinderError::Schema(format!(
            "steps[{}] must be an object, got {}",
            idx,
            kind(step)
        )));
    };

    let name = match step.get("name") {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => bail!(FinderError::Schema(format!(
            "steps[{}].name must be a string, got {}",
            idx,
            kind(other)
        ))),
    };
    if !name.to_lowercase().starts_with(STEP_PREFIX) {
        return Ok(None);
    }

    match step.get("output") {
        Some(Value::Array(outputs)) => Ok(Some(outputs.as_slice())),
        None => bail!(FinderError::Schema(format!(
            "step '{}' (steps[{}]) has no 'output'",
            name, idx
        ))),
        Some(other) => bail!(FinderError::Schema(format!(
            "steps[{}].output must be a list, got {}",
            idx,
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
