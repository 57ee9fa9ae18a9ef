use super::dates::{full_month, leading_number, month_word};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Header,
    FootnoteStart,
    EntryStart,
    Continuation,
}

/// Verdict on the first token of a line read as a day numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayToken {
    /// "1st.", "2d,", "12." — a day followed by punctuation.
    Accepted { day: u32 },
    /// "29th", "4" — could be a day or an ordinal inside prose.
    Ambiguous { day: u32 },
    Rejected,
}

const ORDINAL_SUFFIXES: &[&str] = &["st", "nd", "rd", "th"];
/// Days written with a bare "d" suffix ("2d", "23d").
const BARE_D_DAYS: &[u32] = &[2, 3, 22, 23];

pub fn classify(raw: &str) -> LineKind {
    let line = raw.trim();
    if line.is_empty() {
        LineKind::Blank
    } else if is_footnote_start(raw) {
        LineKind::FootnoteStart
    } else if is_header(line) {
        LineKind::Header
    } else if is_entry_start(line) {
        LineKind::EntryStart
    } else {
        LineKind::Continuation
    }
}

/// Section header such as "JANUARY 1659-1660".
pub fn is_header(line: &str) -> bool {
    let line = line.trim();
    let Some(first) = line.split_whitespace().next() else {
        return false;
    };
    if full_month(&first.replace([',', '.'], "")).is_none() {
        return false;
    }
    // digits and hyphens are uncased, so this is "upper-case once they are removed"
    line.chars().any(|c| c.is_ascii_digit()) && !line.chars().any(char::is_lowercase)
}

/// Indented line opening with `[`; inline brackets are never indented.
pub fn is_footnote_start(raw: &str) -> bool {
    raw.starts_with([' ', '\t']) && raw.trim_start().starts_with('[')
}

pub fn classify_day_token(token: &str) -> DayToken {
    if !token.starts_with(|c: char| c.is_ascii_digit()) {
        return DayToken::Rejected;
    }
    let Some(day) = leading_number(token) else {
        return DayToken::Rejected;
    };
    if !(1..=31).contains(&day) {
        return DayToken::Rejected;
    }

    let digits = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let rest = &token[digits..];
    if rest.is_empty() {
        return DayToken::Ambiguous { day };
    }
    if let Some(after_dot) = rest.strip_prefix('.') {
        // "3.30" is a time or a sum, not "3."
        return match after_dot.chars().next() {
            Some(c) if c.is_alphanumeric() => DayToken::Rejected,
            _ => DayToken::Accepted { day },
        };
    }

    let suffix = ORDINAL_SUFFIXES
        .iter()
        .copied()
        .find(|s| rest.starts_with(*s))
        .or_else(|| (rest.starts_with('d') && BARE_D_DAYS.contains(&day)).then_some("d"));
    let Some(suffix) = suffix else {
        return DayToken::Rejected;
    };

    match rest[suffix.len()..].chars().next() {
        None => DayToken::Ambiguous { day },
        Some(c) if c.is_alphanumeric() => DayToken::Rejected,
        Some(_) => DayToken::Accepted { day },
    }
}

/// A bare ordinal only starts an entry when followed by a day-of-week
/// annotation or a month: "29th (Lord's day)", "4th May".
fn confirms_day(next: &str) -> bool {
    next.starts_with('(') || month_word(next).is_some()
}

pub fn is_entry_start(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return false;
    };
    let next = tokens.next();

    match classify_day_token(first) {
        DayToken::Accepted { .. } => true,
        DayToken::Ambiguous { .. } => next.is_some_and(confirms_day),
        DayToken::Rejected => {
            month_word(first).is_some()
                && next.is_some_and(|t| t.starts_with(|c: char| c.is_ascii_digit()))
        }
    }
}
