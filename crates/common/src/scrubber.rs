use once_cell::sync::Lazy;
use regex::Regex;

/// Literal scrubber for generated SQL before it reaches the logs.
///
/// Matches single-quoted string literals, including doubled quotes inside
/// them. Backslash-escaped literals are only redacted up to the first
/// escaped quote.
static STRING_LITERAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(?:[^']|'')*'").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").unwrap());

/// Replace every string literal with `'?'`.
pub fn redact_literals(sql: &str) -> String {
    STRING_LITERAL_REGEX.replace_all(sql, "'?'").to_string()
}

/// Redact e-mail addresses that appear outside literals, e.g. in identifiers.
pub fn scrub(input: &str) -> String {
    let redacted = redact_literals(input);
    EMAIL_REGEX.replace_all(&redacted, "[EMAIL]").to_string()
}
