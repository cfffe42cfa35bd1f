//! Text parsing utilities for search and tag input

/// Fold text for case-insensitive comparison.
///
/// Both entity stores compare names and search text through this function, so
/// the database keeps folded copies of the searchable columns.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Parse a comma-separated tag list from a query string.
///
/// Names are trimmed, blanks dropped and duplicates (ignoring case) removed,
/// keeping the first spelling.
pub fn parse_tag_list(src: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut names = Vec::new();

    for name in src.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let folded = fold_case(name);
        if !seen.contains(&folded) {
            seen.push(folded);
            names.push(name.to_string());
        }
    }

    names
}

/// Trimmed text, or `None` when blank
pub fn non_blank(src: Option<&str>) -> Option<&str> {
    src.map(str::trim).filter(|s| !s.is_empty())
}
