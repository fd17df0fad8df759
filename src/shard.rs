//! Loading a shard of records from a local file for the sequential driver.

use crate::Result;

use anyhow::{Context, bail};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read one shard.
///
/// Two layouts are accepted:
/// - a single JSON list of records (first non-blank character is `[`);
/// - JSON Lines, one record per non-blank line.
///
/// `null` entries are kept; the mapper skips them.
pub fn read_shard(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read shard file {}", path.display()))?;
    parse_shard(&text).with_context(|| format!("parse shard file {}", path.display()))
}

fn parse_shard(text: &str) -> Result<Vec<Value>> {
    if text.trim_start().starts_with('[') {
        return match serde_json::from_str::<Value>(text)? {
            Value::Array(records) => Ok(records),
            // Unreachable for valid JSON starting with '['.
            other => bail!("expected a list of records, got {}", other),
        };
    }

    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let rec: Value =
            serde_json::from_str(line).with_context(|| format!("bad record at line {}", lno))?;
        out.push(rec);
    }
    Ok(out)
}
