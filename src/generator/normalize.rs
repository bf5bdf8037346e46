use regex::Regex;
use std::sync::LazyLock;

static POSSESSIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'s\b|’s\b").expect("possessive pattern is valid"));

/// Lowercase a raw request and drop possessive suffixes (`'s`, `’s`).
///
/// Punctuation and inner whitespace are left alone; only the ends are trimmed.
pub fn normalize(request: &str) -> String {
    let lowered = request.to_lowercase();
    POSSESSIVE.replace_all(&lowered, "").trim().to_string()
}
