//! Parsing of the newline-delimited extra-headers input.

use indexmap::IndexMap;

/// Parse a block of `Name: value` lines into an ordered map.
///
/// Each non-empty line is split on the first colon. Header names are
/// lowercased so duplicates merge case-insensitively; values repeated
/// under one name are joined with `", "` in the order they appear.
/// A line without a colon becomes a name with an empty value, which the
/// transport later drops with a warning instead of failing the run.
pub fn parse_header_block(raw: &str) -> IndexMap<String, String> {
    let mut headers: IndexMap<String, String> = IndexMap::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (name, value) = match line.find(':') {
            Some(idx) => (line[..idx].trim().to_lowercase(), line[idx + 1..].trim().to_string()),
            None => (line.to_lowercase(), String::new()),
        };

        headers
            .entry(name)
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    headers
}
