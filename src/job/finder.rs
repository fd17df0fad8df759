use crate::Result;
use crate::error::FinderError;
use crate::job::config::JobConfig;
use crate::output::write_records;
use crate::record;
use crate::spec::CompiledSpec;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Reducer result handed back to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub nrecords: usize,
}

/// A configured record search.
///
/// Holds only immutable configuration, so one instance can serve every
/// mapper invocation of a job.
#[derive(Debug, Clone)]
pub struct RecordFinder {
    spec: CompiledSpec,
    fields: Vec<String>,
    output: Option<PathBuf>,
    verbose: bool,
}

impl RecordFinder {
    /// Compile the job's spec. Fails on an unparsable pattern.
    pub fn new(config: JobConfig) -> Result<Self> {
        let spec = CompiledSpec::from_map(&config.spec)?;
        if config.verbose {
            log::info!("### SPEC {:?}", spec);
        }
        Ok(Self {
            spec,
            fields: config.fields,
            output: config.output,
            verbose: config.verbose,
        })
    }

    /// Parse the option mapping and compile it in one go.
    pub fn from_value(config: &Value) -> Result<Self> {
        Self::new(JobConfig::from_value(config)?)
    }

    /// Keep the records of one shard that match the spec, in input order.
    ///
    /// Null entries are skipped. A record that cannot be inspected fails the
    /// whole shard.
    pub fn map<I>(&self, records: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut matched = Vec::new();
        for rec in records {
            if rec.is_null() {
                continue;
            }
            if record::matches(&rec, &self.spec)? {
                matched.push(rec);
            }
        }
        log::trace!("shard produced {} matches", matched.len());
        Ok(matched)
    }

    /// Gather every mapper output, project, optionally write, and count.
    pub fn reduce<I, B>(&self, batches: I) -> Result<Summary>
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = Value>,
    {
        let mut out = Vec::new();
        let mut nbatches = 0usize;
        let mut nrecords = 0usize;

        for batch in batches {
            nbatches += 1;
            for rec in batch {
                if rec.is_null() {
                    continue;
                }
                nrecords += 1;
                if self.fields.is_empty() {
                    out.push(rec);
                } else {
                    out.push(project(&rec, &self.fields)?);
                }
            }
        }

        if self.verbose {
            log::info!(
                "### Mapper found {} matches in {} batches",
                nrecords,
                nbatches
            );
        }

        if let Some(path) = &self.output {
            write_records(path, &out)?;
            if self.verbose {
                log::info!("wrote {} records to {}", out.len(), path.display());
            }
        }

        Ok(Summary { nrecords })
    }

    /// Map every shard, then reduce once. Used by the local driver.
    pub fn run<I, S>(&self, shards: I) -> Result<Summary>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = Value>,
    {
        let mut batches = Vec::new();
        for shard in shards {
            batches.push(self.map(shard)?);
        }
        self.reduce(batches)
    }
}

/// Pick `fields` out of `record`, in order. Every field must be present.
fn project(record: &Value, fields: &[String]) -> Result<Value> {
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        match record.get(field) {
            Some(v) => values.push(v.clone()),
            None => bail!(FinderError::MissingField(field.clone())),
        }
    }
    Ok(Value::Array(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rec(id: u64, dataset: &str) -> Value {
        json!({
            "wmaid": id,
            "run": id * 10,
            "lumi": id + 1,
            "steps": [{"name": "cmsRun1", "output": [{"dataset": dataset}]}]
        })
    }

    fn finder(config: Value) -> RecordFinder {
        RecordFinder::from_value(&config).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("record-finder-{}-{}", std::process::id(), name))
    }

    #[test]
    fn map_filters_and_keeps_order() {
        let f = finder(json!({"spec": {"dataset": "MC_"}}));
        let input = vec![
            rec(1, "MC_a"),
            Value::Null,
            rec(2, "Data2018"),
            rec(3, "MC_b"),
            rec(4, "MC_c"),
        ];
        let out = f.map(input).unwrap();
        assert_eq!(out, vec![rec(1, "MC_a"), rec(3, "MC_b"), rec(4, "MC_c")]);
    }

    #[test]
    fn map_is_idempotent() {
        let f = finder(json!({"spec": {"dataset": "MC_"}}));
        let once = f.map(vec![rec(1, "MC_a"), rec(2, "x"), rec(3, "MC_b")]).unwrap();
        let twice = f.map(once.clone()).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn map_with_empty_spec_keeps_nothing() {
        let f = finder(json!({}));
        assert_eq!(f.map(vec![rec(1, "MC_a")]).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn map_propagates_schema_errors() {
        let f = finder(json!({"spec": {"dataset": "MC_"}}));
        let err = f
            .map(vec![rec(1, "MC_a"), json!({"steps": "broken"})])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FinderError>(),
            Some(FinderError::Schema(_))
        ));
    }

    #[test]
    fn map_keeps_record_matched_before_a_malformed_step() {
        let f = finder(json!({"spec": {"dataset": "MC_"}}));
        let early_hit = json!({"steps": [
            {"name": "cmsRun1", "output": [{"dataset": "MC_RunIISummer20"}]},
            {"name": "cmsRun2"}
        ]});
        let out = f.map(vec![early_hit.clone(), rec(2, "Data")]).unwrap();
        assert_eq!(out, vec![early_hit]);
    }

    #[test]
    fn reduce_counts_non_null_records() {
        let f = finder(json!({"spec": {"dataset": "MC_"}}));
        let batches = vec![
            vec![rec(1, "MC_a"), Value::Null],
            vec![],
            vec![rec(2, "MC_b"), rec(3, "MC_c")],
        ];
        assert_eq!(f.reduce(batches).unwrap(), Summary { nrecords: 3 });
    }

    #[test]
    fn reduce_projects_fields_in_order() {
        let path = temp_path("projection.json");
        let f = finder(json!({
            "spec": {"dataset": "MC_"},
            "fields": ["run", "lumi"],
            "output": path.to_string_lossy()
        }));
        let batches = vec![vec![json!({"run": 1, "lumi": 5, "other": "x"})]];
        assert_eq!(f.reduce(batches).unwrap(), Summary { nrecords: 1 });

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!([[1, 5]]));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn reduce_fails_on_missing_projected_field() {
        let f = finder(json!({"spec": {"dataset": "MC_"}, "fields": ["run", "block"]}));
        let err = f.reduce(vec![vec![json!({"run": 1})]]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FinderError>(),
            Some(&FinderError::MissingField("block".to_string()))
        );
    }

    #[test]
    fn reduce_writes_full_records() {
        let path = temp_path("full.json");
        let f = finder(json!({"spec": {"dataset": "MC_"}, "output": path.to_string_lossy()}));
        let records = vec![rec(1, "MC_a"), rec(2, "MC_b")];
        let summary = f
            .reduce(vec![vec![records[0].clone()], vec![records[1].clone()]])
            .unwrap();
        assert_eq!(summary.nrecords, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n{"));
        assert!(text.ends_with("}]\n"));
        let written: Vec<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(written, records);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn run_maps_then_reduces() {
        let f = finder(json!({"spec": {"dataset": "MC_"}}));
        let shards = vec![
            vec![rec(1, "MC_a"), rec(2, "Data")],
            vec![Value::Null, rec(3, "MC_b")],
        ];
        assert_eq!(f.run(shards).unwrap(), Summary { nrecords: 2 });
    }

    #[test]
    fn summary_serializes_as_nrecords() {
        let s = serde_json::to_value(Summary { nrecords: 7 }).unwrap();
        assert_eq!(s, json!({"nrecords": 7}));
    }
}
