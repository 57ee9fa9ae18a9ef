pub mod brackets;
pub mod dates;
pub mod lines;
pub mod segment;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::ParserConfig;
use crate::store::{self, DiaryEntry};
use segment::Segmenter;

/// Single pass: raw text → lines → segmenter → entries.
pub fn parse_document(text: &str, config: &ParserConfig) -> Vec<DiaryEntry> {
    let mut segmenter = Segmenter::new(config);
    let mut entries: Vec<DiaryEntry> = text.lines().filter_map(|l| segmenter.step(l)).collect();
    let (year, month) = segmenter.context();
    debug!(year, month, "Last section reached");
    entries.extend(segmenter.finish());
    entries
}

/// Parse `input` and write the NDJSON stream to `output`. Nothing is
/// written if the input cannot be read.
pub fn parse_file(input: &Path, output: &Path, config: &ParserConfig) -> Result<usize> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read diary text: {}", input.display()))?;
    info!("Parsing {} ({} chars)", input.display(), text.len());

    let entries = parse_document(&text, config);
    store::write_entries(output, &entries)?;
    info!("Wrote {} entries to {}", entries.len(), output.display());
    Ok(entries.len())
}

// ── Tests ──
