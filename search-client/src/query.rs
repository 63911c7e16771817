//! Search query sanitization.

use std::fmt;

/// Maximum query length in Unicode code points.
const MAX_QUERY_CHARS: usize = 200;

/// A sanitized, non-empty search query.
///
/// Raw user input is trimmed, stripped of control characters and capped at
/// 200 code points before it may be used as a query. A `SearchQuery` is
/// never empty or whitespace-only; input that sanitizes to nothing yields
/// `None`, and callers short-circuit without touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Sanitize raw input, returning `None` when nothing usable remains.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let stripped: String = raw
            .trim()
            .chars()
            .filter(|c| !is_control(*c))
            .collect();

        let mut value = stripped.trim().to_string();
        if let Some((idx, _)) = value.char_indices().nth(MAX_QUERY_CHARS) {
            value.truncate(idx);
        }

        if value.is_empty() { None } else { Some(SearchQuery(value)) }
    }

    /// Returns the sanitized query as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// C0 control characters and DEL.
fn is_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001f}' | '\u{007f}')
}
