pub const SOURCE_URL: &str = "https://www.gutenberg.org/cache/epub/4200/pg4200.txt";
pub const START_MARKER: &str = "JANUARY 1659-1660";
pub const END_MARKER: &str = "END OF THE DIARY.";

pub const TRIMMED_PATH: &str = "data/diary-trimmed.txt";
pub const PARSED_PATH: &str = "output/diary-parsed.ndjson";
pub const STATS_PATH: &str = "output/diary-stats.csv";

/// Rules deciding whether a bracketed span stays inline as a restoration
/// or is pulled out as a footnote.
#[derive(Debug, Clone)]
pub struct BracketRules {
    /// Content at or above this many chars is always a footnote.
    pub max_restoration_len: usize,
    /// Case-insensitive prefixes that mark a footnote.
    pub footnote_prefixes: Vec<String>,
    /// Case-insensitive substrings that mark a footnote.
    pub footnote_keywords: Vec<String>,
    /// Case-sensitive substrings that mark a footnote.
    pub footnote_literals: Vec<String>,
}

impl Default for BracketRules {
    fn default() -> Self {
        Self {
            max_restoration_len: 25,
            footnote_prefixes: vec!["i.e.".into()],
            footnote_keywords: vec!["note".into()],
            footnote_literals: vec!["Ed.".into(), "note:".into()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Month assumed before the first header is seen.
    pub initial_month: u32,
    /// Year assumed before the first header is seen.
    pub initial_year: i32,
    /// Lines starting with this (case-insensitive) open a bookmarks block.
    pub bookmarks_marker: String,
    pub brackets: BracketRules,
    /// Close an open footnote block when an unindented header or entry start shows up.
    pub close_footnote_on_structure: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            initial_month: 1,
            initial_year: 1660,
            bookmarks_marker: "bookmarks".into(),
            brackets: BracketRules::default(),
            close_footnote_on_structure: false,
        }
    }
}
