use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;
use tracing::info;

use crate::store::{self, DiaryEntry};

const KEYWORDS: &[&str] = &[
    "wife", "lord", "king", "duke", "money", "dinner", "supper",
    "bed", "office", "plague", "fire", "music", "play", "church",
];

static KEYWORD_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw))).unwrap())
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStats {
    pub date: String,
    pub entry_length_chars: usize,
    pub entry_word_count: usize,
    pub footnote_count: usize,
    pub footnote_word_count: usize,
    /// Whole-word keyword hits, aligned with `KEYWORDS`.
    pub mentions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub entries: usize,
    pub total_words: usize,
    pub average_words: f64,
    pub longest_date: String,
    pub longest_words: usize,
}

impl Summary {
    pub fn print(&self) {
        println!("\nSummary:");
        println!("Entries: {}", self.entries);
        println!("Total Words: {}", group_thousands(self.total_words));
        println!("Average Words per Entry: {:.0}", self.average_words);
        println!(
            "Longest Entry: {} ({} words)",
            self.longest_date,
            group_thousands(self.longest_words)
        );
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn entry_stats(entry: &DiaryEntry) -> EntryStats {
    EntryStats {
        date: entry.date.clone(),
        entry_length_chars: entry.entry.chars().count(),
        entry_word_count: word_count(&entry.entry),
        footnote_count: entry.footnotes.len(),
        footnote_word_count: entry.footnotes.iter().map(|f| word_count(f)).sum(),
        mentions: KEYWORD_RES
            .iter()
            .map(|re| re.find_iter(&entry.entry).count())
            .collect(),
    }
}

/// Per-entry rows, computed in parallel chunks; output order follows input.
pub fn compute_rows(entries: &[DiaryEntry]) -> Result<Vec<EntryStats>> {
    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut rows = Vec::with_capacity(entries.len());
    for chunk in entries.chunks(500) {
        let stats: Vec<EntryStats> = chunk.par_iter().map(entry_stats).collect();
        rows.extend(stats);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(rows)
}

/// Totals over all rows; ties for the longest entry go to the earliest.
pub fn summarize(rows: &[EntryStats]) -> Option<Summary> {
    let longest = rows
        .iter()
        .fold(None::<&EntryStats>, |best, r| match best {
            Some(b) if b.entry_word_count >= r.entry_word_count => Some(b),
            _ => Some(r),
        })?;
    let total_words: usize = rows.iter().map(|r| r.entry_word_count).sum();

    Some(Summary {
        entries: rows.len(),
        total_words,
        average_words: total_words as f64 / rows.len() as f64,
        longest_date: longest.date.clone(),
        longest_words: longest.entry_word_count,
    })
}

pub fn write_csv(path: &Path, rows: &[EntryStats]) -> Result<()> {
    store::ensure_parent_dir(path)?;
    let file = File::create(path)
        .with_context(|| format!("Failed to create stats file: {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let mut header = vec![
        "date".to_string(),
        "entry_length_chars".to_string(),
        "entry_word_count".to_string(),
        "footnote_count".to_string(),
        "footnote_word_count".to_string(),
    ];
    header.extend(KEYWORDS.iter().map(|kw| format!("mentions_{}", kw)));
    write_record(&mut w, &header)?;

    for r in rows {
        let mut fields = vec![
            r.date.clone(),
            r.entry_length_chars.to_string(),
            r.entry_word_count.to_string(),
            r.footnote_count.to_string(),
            r.footnote_word_count.to_string(),
        ];
        fields.extend(r.mentions.iter().map(|n| n.to_string()));
        write_record(&mut w, &fields)?;
    }

    w.flush().context("Failed to flush stats file")?;
    Ok(())
}

/// Quote a field holding a comma, quote or line break; inner quotes are doubled.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_record(w: &mut impl Write, fields: &[String]) -> Result<()> {
    let line: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(w, "{}", line.join(","))?;
    Ok(())
}

/// Read parsed entries, write the per-entry table, print the summary.
pub fn generate(input: &Path, output: &Path) -> Result<Option<Summary>> {
    println!("Analyzing {}...", input.display());
    let entries: Vec<DiaryEntry> = store::load_lines(input)?
        .into_iter()
        .map(|(_, e)| e)
        .collect();
    if entries.is_empty() {
        println!("No valid entries found.");
        return Ok(None);
    }

    let rows = compute_rows(&entries)?;
    write_csv(output, &rows)?;
    info!("Stats written to {}", output.display());
    println!("Stats generated for {} entries.", rows.len());
    println!("Output saved to {}", output.display());

    let summary = summarize(&rows);
    if let Some(s) = &summary {
        s.print();
    }
    Ok(summary)
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
