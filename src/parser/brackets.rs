use std::sync::LazyLock;

use regex::Regex;

use crate::config::BracketRules;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\d+\}").unwrap());

/// Inline placeholder for footnote `index`.
pub fn marker(index: usize) -> String {
    format!("{{{index}}}")
}

/// Short editorial restorations ("[he]", "[and]") stay in the text.
pub fn is_restoration(content: &str, rules: &BracketRules) -> bool {
    let lower = content.to_lowercase();
    let lower_trimmed = lower.trim_start();

    content.chars().count() < rules.max_restoration_len
        && !rules
            .footnote_prefixes
            .iter()
            .any(|p| lower_trimmed.starts_with(&p.to_lowercase()))
        && !rules
            .footnote_keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
        && !rules
            .footnote_literals
            .iter()
            .any(|l| content.contains(l.as_str()))
}

/// Replace explanatory `[...]` spans with `{N}` markers, appending their
/// content to `footnotes`. Numbering continues from `footnotes.len()`.
/// An unmatched `[` and everything after it is copied through.
pub fn split_brackets(text: &str, footnotes: &mut Vec<String>, rules: &BracketRules) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let content = &after[..close];
        // markers of block footnotes that landed inside this span
        let carried: Vec<&str> = MARKER_RE.find_iter(content).map(|m| m.as_str()).collect();
        let clean = MARKER_RE.replace_all(content, "");
        if is_restoration(&clean, rules) {
            out.push('[');
            out.push_str(content);
            out.push(']');
        } else {
            footnotes.push(clean.trim().to_string());
            out.push_str(&marker(footnotes.len() - 1));
            for m in carried {
                out.push_str(m);
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> (String, Vec<String>) {
        let mut footnotes = Vec::new();
        let out = split_brackets(text, &mut footnotes, &BracketRules::default());
        (out, footnotes)
    }

    #[test]
    fn short_restoration_kept() {
        let (out, notes) = split("and [he] said so");
        assert_eq!(out, "and [he] said so");
        assert!(notes.is_empty());
    }

    #[test]
    fn long_note_extracted() {
        let (out, notes) =
            split("[This is a long explanatory editorial note about the context]");
        assert_eq!(out, "{0}");
        assert_eq!(notes, vec!["This is a long explanatory editorial note about the context"]);
    }

    #[test]
    fn short_but_flagged_content_extracted() {
        let (out, notes) = split("a [i.e. the Duke] b [see note] c [Ed.] d");
        assert_eq!(out, "a {0} b {1} c {2} d");
        assert_eq!(notes, vec!["i.e. the Duke", "see note", "Ed."]);
    }

    #[test]
    fn numbering_continues_from_existing() {
        let mut footnotes = vec!["earlier block note".to_string()];
        let out = split_brackets(
            "text [a rather long explanation of something] more",
            &mut footnotes,
            &BracketRules::default(),
        );
        assert_eq!(out, "text {1} more");
        assert_eq!(footnotes.len(), 2);
    }

    #[test]
    fn existing_marker_moved_out_of_extracted_span() {
        let mut footnotes = vec!["Block note.".to_string()];
        let out = split_brackets(
            "Went [to the{0} hall of the great company at Westminster].",
            &mut footnotes,
            &BracketRules::default(),
        );
        assert_eq!(out, "Went {1}{0}.");
        assert_eq!(
            footnotes,
            vec!["Block note.", "to the hall of the great company at Westminster"]
        );
    }

    #[test]
    fn existing_marker_kept_inside_restoration() {
        let mut footnotes = vec!["Block note.".to_string()];
        let out = split_brackets("and [he{0}] said", &mut footnotes, &BracketRules::default());
        assert_eq!(out, "and [he{0}] said");
        assert_eq!(footnotes.len(), 1);
    }

    #[test]
    fn unmatched_bracket_passthrough() {
        let (out, notes) = split("went [to the hall and never closed");
        assert_eq!(out, "went [to the hall and never closed");
        assert!(notes.is_empty());
    }

    #[test]
    fn configurable_threshold() {
        let rules = BracketRules {
            max_restoration_len: 4,
            ..BracketRules::default()
        };
        let mut footnotes = Vec::new();
        let out = split_brackets("[he] and [the king]", &mut footnotes, &rules);
        assert_eq!(out, "[he] and {0}");
        assert_eq!(footnotes, vec!["the king"]);
    }
}
