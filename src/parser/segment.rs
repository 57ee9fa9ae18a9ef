use tracing::{debug, warn};

use super::brackets::{marker, split_brackets};
use super::dates::{self, EntryDate};
use super::lines::{self, LineKind};
use crate::config::{BracketRules, ParserConfig};
use crate::store::DiaryEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Editorial bookmarks; skipped until the next header or entry start.
    Bookmarks,
    /// Inside an indented multi-line `[...]` block.
    Footnote { chunks: Vec<String> },
}

#[derive(Debug)]
struct EntryBuilder {
    date: EntryDate,
    lines: Vec<String>,
    footnotes: Vec<String>,
}

impl EntryBuilder {
    fn attach_footnote(&mut self, text: String) {
        self.footnotes.push(text);
        let m = marker(self.footnotes.len() - 1);
        match self.lines.last_mut() {
            Some(last) => last.push_str(&m),
            None => self.lines.push(m),
        }
    }

    fn finish(self, rules: &BracketRules) -> Option<DiaryEntry> {
        let joined = self.lines.join(" ");
        let mut footnotes = self.footnotes;
        let entry = split_brackets(&joined, &mut footnotes, rules);
        if entry.is_empty() && footnotes.is_empty() {
            return None;
        }
        Some(DiaryEntry {
            date: self.date.to_string(),
            entry,
            footnotes,
        })
    }
}

/// Line-at-a-time state machine turning raw diary lines into entries.
/// Feed every line to [`Segmenter::step`], then call [`Segmenter::finish`].
pub struct Segmenter<'a> {
    config: &'a ParserConfig,
    month: u32,
    year: i32,
    mode: Mode,
    entry: Option<EntryBuilder>,
}

impl<'a> Segmenter<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self {
            config,
            month: config.initial_month,
            year: config.initial_year,
            mode: Mode::Normal,
            entry: None,
        }
    }

    /// Current (year, month) context.
    pub fn context(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// Consume one raw line; returns the previous entry when this line starts a new one.
    pub fn step(&mut self, raw: &str) -> Option<DiaryEntry> {
        let kind = lines::classify(raw);
        if kind == LineKind::Blank {
            return None;
        }
        let line = raw.trim();

        match &mut self.mode {
            Mode::Normal => {
                if self.is_bookmarks_marker(line) {
                    debug!("Entering bookmarks block");
                    self.mode = Mode::Bookmarks;
                    return None;
                }
            }
            Mode::Bookmarks => {
                if !matches!(kind, LineKind::Header | LineKind::EntryStart) {
                    debug!(line, "Skipping bookmarks line");
                    return None;
                }
                self.mode = Mode::Normal;
            }
            Mode::Footnote { chunks } => {
                let interrupts = self.config.close_footnote_on_structure
                    && !raw.starts_with([' ', '\t'])
                    && matches!(kind, LineKind::Header | LineKind::EntryStart);
                if !interrupts {
                    chunks.push(line.to_string());
                    if line.ends_with(']') {
                        self.close_footnote_block();
                    }
                    return None;
                }
                warn!(line, "Footnote block interrupted by structural line");
                self.close_footnote_block();
            }
        }

        self.step_normal(kind, line)
    }

    /// End of input: close any open footnote and flush the last entry.
    pub fn finish(mut self) -> Option<DiaryEntry> {
        if matches!(self.mode, Mode::Footnote { .. }) {
            warn!("Footnote block still open at end of input");
            self.close_footnote_block();
        }
        self.flush()
    }

    fn step_normal(&mut self, kind: LineKind, line: &str) -> Option<DiaryEntry> {
        match kind {
            LineKind::FootnoteStart => {
                let inner = &line[1..];
                match inner.strip_suffix(']') {
                    Some(text) => self.attach_footnote(text.trim().to_string()),
                    None => {
                        let first = inner.trim();
                        let chunks = if first.is_empty() {
                            Vec::new()
                        } else {
                            vec![first.to_string()]
                        };
                        self.mode = Mode::Footnote { chunks };
                    }
                }
                None
            }
            LineKind::Header => {
                match dates::parse_header(line) {
                    dates::HeaderDate {
                        month: Some(month),
                        year: Some(year),
                    } => {
                        debug!(month, year, "Section header");
                        self.month = month;
                        self.year = year;
                    }
                    _ => debug!(line, "Unparsable header, keeping previous month/year"),
                }
                None
            }
            LineKind::EntryStart => {
                let finished = self.flush();
                let date = dates::resolve_entry_date(line, self.year, self.month);
                let body = dates::strip_date_prefix(line);
                let lines = if body.is_empty() {
                    Vec::new()
                } else {
                    vec![body.to_string()]
                };
                self.entry = Some(EntryBuilder {
                    date,
                    lines,
                    footnotes: Vec::new(),
                });
                finished
            }
            LineKind::Continuation => {
                match self.entry.as_mut() {
                    Some(entry) => entry.lines.push(line.to_string()),
                    None => debug!(line, "Text before first entry dropped"),
                }
                None
            }
            LineKind::Blank => None,
        }
    }

    fn is_bookmarks_marker(&self, line: &str) -> bool {
        let marker = &self.config.bookmarks_marker;
        !marker.is_empty() && line.to_lowercase().starts_with(&marker.to_lowercase())
    }

    fn close_footnote_block(&mut self) {
        let Mode::Footnote { chunks } = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return;
        };
        let joined = chunks.join(" ");
        let text = joined.strip_suffix(']').unwrap_or(&joined).trim().to_string();
        self.attach_footnote(text);
    }

    fn attach_footnote(&mut self, text: String) {
        match self.entry.as_mut() {
            Some(entry) => entry.attach_footnote(text),
            None => debug!("Footnote before first entry dropped"),
        }
    }

    fn flush(&mut self) -> Option<DiaryEntry> {
        self.entry
            .take()
            .and_then(|entry| entry.finish(&self.config.brackets))
    }
}
