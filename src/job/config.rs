//! Job configuration as handed over by the surrounding tool.
//!
//! JSON shape:
//! ```text
//! {
//!   "spec": {"dataset": "MC_", "lfn": "/store/mc/"},   // field -> matcher
//!   "fields": ["wmaid", "task"],                        // optional projection
//!   "output": "/tmp/records.json",                      // optional file
//!   "verbose": true,                                    // optional
//!   "timerange": [20160101, 20160131]                   // accepted, unused
//! }
//! ```
//!
//! The input value is never modified; recognized options are copied out.

use crate::Result;
use crate::error::FinderError;

use anyhow::bail;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobConfig {
    /// Raw field spec; compiled by `RecordFinder::new`.
    pub spec: Map<String, Value>,
    /// Ordered projection. Empty means full records are emitted.
    pub fields: Vec<String>,
    /// Where the reducer writes its JSON list, if anywhere.
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

/// Raw option shape. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawJobConfig {
    #[serde(default)]
    spec: Option<Map<String, Value>>,

    #[serde(default)]
    fields: Option<Vec<String>>,

    #[serde(default)]
    output: Option<String>,

    #[serde(default)]
    verbose: Option<bool>,

    #[serde(default)]
    timerange: Option<Value>,
}

impl JobConfig {
    /// Build a configuration from the option mapping.
    ///
    /// `null` and `{}` give the default configuration, whose empty spec never
    /// matches. Any other mapping must carry a `spec`. An empty `output`
    /// string means no file is written.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) if map.is_empty() => return Ok(Self::default()),
            Value::Object(_) => {}
            other => bail!(FinderError::Config(format!(
                "configuration must be a mapping, got {}",
                other
            ))),
        }

        let raw = match RawJobConfig::deserialize(value) {
            Ok(raw) => raw,
            Err(err) => bail!(FinderError::Config(err.to_string())),
        };

        if raw.timerange.is_some() {
            log::debug!("timerange is ignored for record search");
        }

        let Some(spec) = raw.spec else {
            bail!(FinderError::Config(
                "'spec' is required when other options are given".to_string()
            ));
        };

        Ok(Self {
            spec,
            fields: raw.fields.unwrap_or_default(),
            output: raw.output.filter(|s| !s.is_empty()).map(PathBuf::from),
            verbose: raw.verbose.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn full_configuration() {
        let value = json!({
            "spec": {"dataset": "MC_"},
            "fields": ["run", "lumi"],
            "output": "/tmp/out.json",
            "verbose": true,
            "timerange": [20160101, 20160131],
            "extra": "ignored"
        });
        let cfg = JobConfig::from_value(&value).unwrap();
        assert_eq!(cfg.spec.get("dataset"), Some(&json!("MC_")));
        assert_eq!(cfg.fields, vec!["run".to_string(), "lumi".to_string()]);
        assert_eq!(cfg.output, Some(PathBuf::from("/tmp/out.json")));
        assert!(cfg.verbose);
    }

    #[test]
    fn input_is_left_untouched() {
        let value = json!({"spec": {"a": "b"}, "verbose": true, "output": "x", "timerange": 1});
        let before = value.clone();
        JobConfig::from_value(&value).unwrap();
        assert_eq!(value, before);
    }

    #[test]
    fn null_and_empty_give_defaults() {
        assert_eq!(JobConfig::from_value(&json!(null)).unwrap(), JobConfig::default());
        assert_eq!(JobConfig::from_value(&json!({})).unwrap(), JobConfig::default());
    }

    #[test]
    fn missing_spec_is_a_config_error() {
        for bad in [
            json!({"verbose": true}),
            json!({"fields": ["run"], "output": "/tmp/out.json"}),
            json!({"spec": null, "timerange": 1}),
        ] {
            let err = JobConfig::from_value(&bad).unwrap_err();
            assert_eq!(
                err.downcast_ref::<FinderError>(),
                Some(&FinderError::Config(
                    "'spec' is required when other options are given".to_string()
                ))
            );
        }
    }

    #[test]
    fn explicit_empty_spec_is_allowed() {
        let cfg = JobConfig::from_value(&json!({"spec": {}, "verbose": true})).unwrap();
        assert!(cfg.spec.is_empty());
        assert!(cfg.verbose);
    }

    #[test]
    fn empty_output_means_no_file() {
        let cfg = JobConfig::from_value(&json!({"spec": {}, "output": ""})).unwrap();
        assert_eq!(cfg.output, None);
    }

    #[test]
    fn malformed_options_are_config_errors() {
        for bad in [
            json!("spec"),
            json!([1, 2]),
            json!({"spec": ["dataset"]}),
            json!({"spec": {}, "fields": "run"}),
            json!({"spec": {}, "fields": [1]}),
            json!({"spec": {}, "output": 3}),
            json!({"spec": {}, "verbose": "yes"}),
        ] {
            let err = JobConfig::from_value(&bad).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<FinderError>(), Some(FinderError::Config(_))),
                "{} gave {:?}",
                bad,
                err
            );
        }
    }
}
