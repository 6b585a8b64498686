//! Turning submitted text into candidate username lines.

/// Most candidate lines accepted from one uploaded file.
pub const FILE_LINE_LIMIT: usize = 10_000;

/// Split `raw` on line breaks, trim each line, and drop blank ones.
///
/// # Examples
/// ```
/// use namecheck::domain::candidate_lines;
///
/// assert_eq!(candidate_lines("alpha\r\n\n  beta  \n"), vec!["alpha", "beta"]);
/// ```
#[must_use]
pub fn candidate_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Normalize a submitted list; entries containing line breaks are split.
#[must_use]
pub fn normalize_candidates<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| candidate_lines(entry.as_ref()))
        .collect()
}

/// Candidate lines of an uploaded file, capped at [`FILE_LINE_LIMIT`].
///
/// A leading byte-order mark is ignored.
#[must_use]
pub fn file_candidate_lines(contents: &str) -> Vec<String> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut lines = candidate_lines(contents);
    lines.truncate(FILE_LINE_LIMIT);
    lines
}
