//! The address grammar: a practical `local@domain.tld` pattern

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email pattern")
});

static EMAIL_EXACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Returns every address-shaped substring of `text`, in order of appearance
///
/// Surrounding dots (sentence ends, `...name@`) are trimmed from each match.
pub fn scan(text: &str) -> Vec<&str> {
    EMAIL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim_matches('.'))
        .filter(|candidate| is_address(candidate))
        .collect()
}

/// Returns true if the whole of `candidate` conforms to the address grammar
pub fn is_address(candidate: &str) -> bool {
    EMAIL_EXACT.is_match(candidate) && !candidate.contains("..")
}
