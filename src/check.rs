use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::store;

#[derive(Debug, Deserialize)]
struct DatedLine {
    #[serde(default)]
    date: Option<String>,
}

/// A line whose date is earlier than the one before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIssue {
    pub line: usize,
    pub date: NaiveDate,
    pub previous_line: usize,
    pub previous_date: NaiveDate,
    pub diff_days: i64,
}

/// Walk `(line, date)` pairs and report every regression. Missing or
/// unparsable dates are logged and skipped.
pub fn find_regressions(dates: &[(usize, Option<String>)]) -> Vec<OrderIssue> {
    let mut previous: Option<(usize, NaiveDate)> = None;
    let mut issues = Vec::new();

    for (line, raw) in dates {
        let Some(raw) = raw.as_deref().filter(|d| !d.is_empty()) else {
            warn!("Line {}: Missing date", line);
            continue;
        };
        let date = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                warn!("Line {}: Invalid date format {:?}: {}", line, raw, e);
                continue;
            }
        };

        if let Some((previous_line, previous_date)) = previous {
            if date < previous_date {
                issues.push(OrderIssue {
                    line: *line,
                    date,
                    previous_line,
                    previous_date,
                    diff_days: (previous_date - date).num_days(),
                });
            }
        }
        previous = Some((*line, date));
    }

    issues
}

pub fn check_file(path: &Path) -> Result<Vec<OrderIssue>> {
    println!("Checking {}...", path.display());
    let dates: Vec<(usize, Option<String>)> = store::load_lines::<DatedLine>(path)?
        .into_iter()
        .map(|(line, d)| (line, d.date))
        .collect();

    let issues = find_regressions(&dates);
    print_report(&issues);
    Ok(issues)
}

fn print_report(issues: &[OrderIssue]) {
    if issues.is_empty() {
        println!("All entries are in chronological order.");
        return;
    }
    println!("Found {} out-of-order entries:", issues.len());
    for i in issues {
        println!(
            "Line {} ({}) is BEFORE Line {} ({}) by {} days.",
            i.line, i.date, i.previous_line, i.previous_date, i.diff_days
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(items: &[Option<&str>]) -> Vec<(usize, Option<String>)> {
        items
            .iter()
            .enumerate()
            .map(|(i, d)| (i + 1, d.map(String::from)))
            .collect()
    }

    #[test]
    fn in_order_has_no_issues() {
        let d = dates(&[Some("1660-01-01"), Some("1660-01-01"), Some("1660-01-02")]);
        assert!(find_regressions(&d).is_empty());
    }

    #[test]
    fn regression_reports_gap_in_days() {
        let d = dates(&[Some("1660-01-01"), Some("1660-03-01"), Some("1660-02-27"), Some("1660-02-28")]);
        let issues = find_regressions(&d);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 3);
        assert_eq!(issues[0].previous_line, 2);
        assert_eq!(issues[0].diff_days, 3);
    }

    #[test]
    fn previous_advances_even_after_regression() {
        let d = dates(&[Some("1660-05-10"), Some("1660-05-01"), Some("1660-05-02")]);
        let issues = find_regressions(&d);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn bad_dates_skipped() {
        let d = dates(&[Some("1660-01-05"), None, Some("1660-02-30"), Some(""), Some("1660-01-04")]);
        let issues = find_regressions(&d);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 5);
        assert_eq!(issues[0].previous_line, 1);
        assert_eq!(issues[0].diff_days, 1);
    }

    #[test]
    fn check_file_reads_ndjson() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parsed.ndjson");
        std::fs::write(
            &path,
            "{\"date\":\"1660-01-02\",\"entry\":\"a\",\"footnotes\":[]}\nnot json\n{\"date\":\"1660-01-01\",\"entry\":\"b\",\"footnotes\":[]}\n",
        )
        .unwrap();
        let issues = check_file(&path).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 3);
    }
}
