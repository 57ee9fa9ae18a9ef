use std::fmt;

const MONTHS: &[&str] = &[
    "JANUARY", "FEBRUARY", "MARCH", "APRIL", "MAY", "JUNE",
    "JULY", "AUGUST", "SEPTEMBER", "OCTOBER", "NOVEMBER", "DECEMBER",
];

const SHORT_MONTHS: &[(&str, u32)] = &[
    ("Jan", 1), ("Feb", 2), ("Mar", 3), ("Apr", 4), ("May", 5), ("Jun", 6),
    ("Jul", 7), ("Aug", 8), ("Sep", 9), ("Sept", 9), ("Oct", 10), ("Nov", 11), ("Dec", 12),
];

const ORDINAL_SUFFIXES: &[&str] = &["st", "nd", "rd", "th", "d"];

/// Month and year announced by a section header. Either half may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDate {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Full upper-case month name ("MARCH") to its number.
pub fn full_month(word: &str) -> Option<u32> {
    MONTHS.iter().position(|m| *m == word).map(|i| i as u32 + 1)
}

/// Month word as written in entry prose: "Jan.", "Sept", "March,".
pub fn month_word(token: &str) -> Option<u32> {
    let clean = token
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .replace('.', "");
    if clean.is_empty() {
        return None;
    }
    SHORT_MONTHS
        .iter()
        .find(|(m, _)| *m == clean)
        .map(|(_, n)| *n)
        .or_else(|| full_month(&clean.to_uppercase()))
}

/// Leading ASCII digits of a token as a number.
pub fn leading_number(token: &str) -> Option<u32> {
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token[..end].parse().ok()
}

pub fn parse_header(line: &str) -> HeaderDate {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return HeaderDate { month: None, year: None };
    };
    let month = full_month(&first.replace([',', '.'], ""));
    let last = tokens.last().unwrap_or(first);
    HeaderDate {
        month,
        year: parse_year(last),
    }
}

/// "1660" → 1660, "1659-1660" → 1660, "1660-61" → 1661.
fn parse_year(token: &str) -> Option<i32> {
    let token = token.trim_matches(|c: char| !c.is_ascii_digit() && c != '-');
    let year_part = match token.split_once('-') {
        Some((_, modern)) => modern,
        None => token,
    };
    let year: i32 = year_part.parse().ok()?;
    Some(if year < 100 { year + 1600 } else { year })
}

/// Date of an entry-start line. A leading month word overrides the current
/// month; the year never changes on entry lines.
pub fn resolve_entry_date(line: &str, current_year: i32, current_month: u32) -> EntryDate {
    let mut tokens = line.split_whitespace().peekable();
    let mut month = current_month;
    if let Some(m) = tokens.peek().and_then(|t| month_word(t)) {
        month = m;
        tokens.next();
    }
    let day = tokens.next().and_then(leading_number).unwrap_or(1);
    EntryDate {
        year: current_year,
        month,
        day,
    }
}

/// Entry text with the leading date ("Jan. 1st.", "2d.", "5th,") removed.
pub fn strip_date_prefix(line: &str) -> &str {
    let mut rest = line.trim_start();

    let mut tokens = rest.split_whitespace();
    if let (Some(first), Some(second)) = (tokens.next(), tokens.next()) {
        if month_word(first).is_some() && second.starts_with(|c: char| c.is_ascii_digit()) {
            rest = rest[first.len()..].trim_start();
        }
    }

    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits == 0 {
        return rest;
    }
    let after_digits = &rest[digits..];
    if after_digits
        .strip_prefix('.')
        .is_some_and(|a| a.starts_with(|c: char| c.is_alphanumeric()))
    {
        return rest;
    }
    rest = after_digits;

    for suffix in ORDINAL_SUFFIXES {
        if let Some(after) = rest.strip_prefix(suffix) {
            if !after.starts_with(|c: char| c.is_alphanumeric()) {
                rest = after;
                break;
            }
        }
    }

    rest.trim_start_matches(['.', ',', ':', ';']).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_dual_year() {
        let h = parse_header("JANUARY 1659-1660");
        assert_eq!(h, HeaderDate { month: Some(1), year: Some(1660) });
    }

    #[test]
    fn header_two_digit_modern_year() {
        let h = parse_header("FEBRUARY 1660-61");
        assert_eq!(h.month, Some(2));
        assert_eq!(h.year, Some(1661));
    }

    #[test]
    fn header_single_year_with_punctuation() {
        let h = parse_header("JUNE 1665.");
        assert_eq!(h, HeaderDate { month: Some(6), year: Some(1665) });
    }

    #[test]
    fn header_without_year() {
        let h = parse_header("MAY");
        assert_eq!(h.month, Some(5));
        assert_eq!(h.year, None);
    }

    #[test]
    fn month_words() {
        assert_eq!(month_word("Jan."), Some(1));
        assert_eq!(month_word("Sept."), Some(9));
        assert_eq!(month_word("March,"), Some(3));
        assert_eq!(month_word("DECEMBER"), Some(12));
        assert_eq!(month_word("Marching"), None);
        assert_eq!(month_word("1st."), None);
    }

    #[test]
    fn entry_date_uses_context() {
        let d = resolve_entry_date("1st. Up early", 1660, 1);
        assert_eq!(d, EntryDate { year: 1660, month: 1, day: 1 });
        assert_eq!(d.to_string(), "1660-01-01");
    }

    #[test]
    fn entry_date_month_override() {
        let d = resolve_entry_date("Feb. 14th. Valentine's day", 1661, 1);
        assert_eq!(d.to_string(), "1661-02-14");
    }

    #[test]
    fn entry_date_day_defaults_to_one() {
        let d = resolve_entry_date("March. Nothing", 1662, 2);
        assert_eq!(d.to_string(), "1662-03-01");
    }

    #[test]
    fn strip_prefix_variants() {
        assert_eq!(strip_date_prefix("1st. Went to office."), "Went to office.");
        assert_eq!(strip_date_prefix("2d. Up"), "Up");
        assert_eq!(strip_date_prefix("5th,(Lord's day). Church"), "(Lord's day). Church");
        assert_eq!(strip_date_prefix("1st (Lord's day). Up"), "(Lord's day). Up");
        assert_eq!(strip_date_prefix("Jan. 3rd. At home"), "At home");
        assert_eq!(strip_date_prefix("12. To Whitehall"), "To Whitehall");
        assert_eq!(strip_date_prefix("1st."), "");
    }

    #[test]
    fn strip_prefix_leaves_times_alone() {
        assert_eq!(strip_date_prefix("3.30 in the afternoon"), "3.30 in the afternoon");
        assert_eq!(strip_date_prefix("Jan. 3.30 at night"), "3.30 at night");
    }
}
