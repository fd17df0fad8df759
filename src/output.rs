//! JSON list writer for reducer results.

use crate::Result;

use anyhow::Context;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `records` to `path` as a JSON list, replacing any existing file.
///
/// Layout: `[` on its own line, one compact record per line separated by
/// `,`, then `]`. A failure part way leaves a truncated file behind.
pub fn write_records(path: &Path, records: &[Value]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("create output file {}", path.display()))?;
    let mut w = BufWriter::new(file);

    write_list(&mut w, records).with_context(|| format!("write output file {}", path.display()))?;
    w.flush()
        .with_context(|| format!("flush output file {}", path.display()))?;
    Ok(())
}

fn write_list<W: Write>(w: &mut W, records: &[Value]) -> Result<()> {
    w.write_all(b"[\n")?;
    for (idx, rec) in records.iter().enumerate() {
        if idx > 0 {
            w.write_all(b",\n")?;
        }
        serde_json::to_writer(&mut *w, rec)?;
    }
    w.write_all(b"]\n")?;
    Ok(())
}
