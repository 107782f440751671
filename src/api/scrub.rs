//! Secret scrubbing for API error bodies.
//!
//! Error responses from moltbook are untrusted text that ends up in logs
//! and error chains, so anything token-shaped is redacted and the body is
//! truncated before it leaves this module.

use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;

/// Key prefixes redacted wherever they appear.
const PREFIX_PATTERNS: [&str; 3] = ["moltbook_sk_", "moltbook_pat_", "sk-"];

/// Markers whose trailing token value is redacted.
const MARKER_PATTERNS: [&str; 8] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "\"authorization\":\"Bearer ",
    "api_key=",
    "access_token=",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "\"token\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    let mut end = from;
    for (i, c) in input[from..].char_indices() {
        if is_secret_char(c) {
            end = from + i + c.len_utf8();
        } else {
            break;
        }
    }
    end
}

fn scrub_after_marker(scrubbed: &mut String, marker: &str, keep_marker: bool) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        // Bare marker without a token value.
        if end == content_start {
            search_from = content_start;
            continue;
        }

        let replace_from = if keep_marker { content_start } else { start };
        scrubbed.replace_range(replace_from..end, "[REDACTED]");
        search_from = replace_from + "[REDACTED]".len();
    }
}

/// Redacts known secret-shaped tokens: bare key prefixes and
/// `marker=<token>` / `"marker":"<token>` forms.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let needs_scrub = PREFIX_PATTERNS
        .iter()
        .chain(MARKER_PATTERNS.iter())
        .any(|pattern| input.contains(pattern));
    if !needs_scrub {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for pattern in PREFIX_PATTERNS {
        scrub_after_marker(&mut scrubbed, pattern, false);
    }
    for marker in MARKER_PATTERNS {
        scrub_after_marker(&mut scrubbed, marker, true);
    }
    Cow::Owned(scrubbed)
}

/// Scrubs and truncates an error body for safe surfacing.
#[must_use]
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let scrubbed = scrubbed.as_ref();
    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &scrubbed[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moltbook_key_prefix_is_redacted() {
        let scrubbed = scrub_secret_patterns("denied for moltbook_sk_abc123XYZ at posts");
        assert!(!scrubbed.contains("abc123XYZ"));
        assert!(scrubbed.contains("[REDACTED]"));
        assert!(scrubbed.contains("at posts"));
    }

    #[test]
    fn bearer_header_value_is_redacted_marker_kept() {
        let scrubbed = scrub_secret_patterns("got Authorization: Bearer tok.en-123, rejected");
        assert_eq!(
            scrubbed.as_ref(),
            "got Authorization: Bearer [REDACTED], rejected"
        );
    }

    #[test]
    fn json_api_key_field_is_redacted() {
        let scrubbed = scrub_secret_patterns(r#"{"api_key":"moltbook_sk_deadbeef","ok":false}"#);
        assert!(!scrubbed.contains("deadbeef"));
    }

    #[test]
    fn clean_text_borrows_unchanged() {
        let input = "a plain error with no secrets";
        assert!(matches!(
            scrub_secret_patterns(input),
            Cow::Borrowed(s) if s == input
        ));
    }

    #[test]
    fn long_bodies_truncate_with_ellipsis() {
        let body = "x".repeat(500);
        let sanitized = sanitize_api_error(&body);
        assert_eq!(sanitized.chars().count(), 203);
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "é".repeat(300);
        let sanitized = sanitize_api_error(&body);
        assert!(sanitized.ends_with("..."));
        assert!(sanitized.chars().count() <= 203);
    }
}
