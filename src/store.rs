use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One dated diary entry. Field order is the NDJSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub footnotes: Vec<String>,
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Write entries as NDJSON. Goes through a temp file so a failed write
/// never leaves a truncated stream behind.
pub fn write_entries(path: &Path, entries: &[DiaryEntry]) -> Result<()> {
    ensure_parent_dir(path)?;
    let temp_path = path.with_extension("ndjson.tmp");

    {
        let file = File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        let mut writer = BufWriter::new(file);
        for entry in entries {
            let line = serde_json::to_string(entry).context("Failed to serialize entry")?;
            writeln!(writer, "{}", line).context("Failed to write entry")?;
        }
        writer.flush().context("Failed to flush entries")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move {} into place", temp_path.display()))?;
    Ok(())
}

/// Read an NDJSON file as `(line_number, record)` pairs. Lines that do not
/// deserialize are logged and skipped.
pub fn load_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut records = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push((line_no, record)),
            Err(e) => warn!("Line {}: Invalid JSON ({})", line_no, e),
        }
    }
    Ok(records)
}
