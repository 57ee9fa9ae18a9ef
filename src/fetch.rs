use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::store;

/// Download the raw diary text.
pub async fn fetch_source(url: &str) -> Result<String> {
    let client = reqwest::Client::new();

    info!("Downloading from {}", url);
    let text = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?
        .error_for_status()
        .with_context(|| format!("Bad response from {}", url))?
        .text()
        .await
        .context("Failed to read response body")?;

    info!("Download complete: {} chars", text.chars().count());
    Ok(text)
}

/// Slice from the first `start` marker through the end of the first `end`
/// marker that follows it.
pub fn trim_to_markers<'a>(content: &'a str, start: &str, end: &str) -> Result<&'a str> {
    let start_idx = content
        .find(start)
        .ok_or_else(|| anyhow!("Start marker {:?} not found", start))?;
    let end_idx = content[start_idx..]
        .find(end)
        .map(|i| start_idx + i + end.len())
        .ok_or_else(|| anyhow!("End marker {:?} not found", end))?;
    Ok(&content[start_idx..end_idx])
}

/// Fetch, trim to the diary span, and write to `output`. Returns the trimmed size in chars.
pub async fn fetch_and_trim(url: &str, start: &str, end: &str, output: &Path) -> Result<usize> {
    let content = fetch_source(url).await?;
    let trimmed = trim_to_markers(&content, start, end)?;

    store::ensure_parent_dir(output)?;
    std::fs::write(output, trimmed)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let size = trimmed.chars().count();
    info!("Wrote trimmed text to {} ({} chars)", output.display(), size);
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "Project preamble\nJANUARY 1659-1660\n1st. Up.\nEND OF THE DIARY.\nLicense text";

    #[test]
    fn trims_inclusive_of_end_marker() {
        let t = trim_to_markers(DOC, "JANUARY 1659-1660", "END OF THE DIARY.").unwrap();
        assert_eq!(t, "JANUARY 1659-1660\n1st. Up.\nEND OF THE DIARY.");
    }

    #[test]
    fn end_marker_searched_after_start() {
        let doc = "END early\nSTART body END late";
        assert_eq!(trim_to_markers(doc, "START", "END").unwrap(), "START body END");
    }

    #[test]
    fn missing_markers_are_errors() {
        assert!(trim_to_markers(DOC, "MARCH 1700", "END OF THE DIARY.").is_err());
        assert!(trim_to_markers(DOC, "JANUARY 1659-1660", "FIN").is_err());
    }
}
