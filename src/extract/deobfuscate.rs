//! Rewrites common anti-scraping spellings of addresses into plain form

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `[at]`, `(at)`, `{at}` with optional surrounding whitespace
static AT_BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*[\[({]\s*at\s*[\])}]\s*").expect("valid at pattern"));

/// `[dot]`, `(dot)`, `{dot}` with optional surrounding whitespace
static DOT_BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*[\[({]\s*dot\s*[\])}]\s*").expect("valid dot pattern"));

/// `local at host dot tld` spelled with bare words
static SPACED_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z0-9._%+-]+)\s+at\s+([a-z0-9-]+(?:\s+dot\s+[a-z0-9-]+)+)\b")
        .expect("valid spaced address pattern")
});

static SPACED_DOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+dot\s+").expect("valid spaced dot pattern"));

/// Applies the de-obfuscation substitutions to `text`
///
/// Bracketed markers are replaced wherever they occur. Bare ` at ` and
/// ` dot ` words are only rewritten inside a `local at host dot tld` run, so
/// ordinary prose ("reach us at sales@shop.test") is left alone.
///
/// # Examples
///
/// ```
/// use email_finder::extract::deobfuscate;
///
/// assert_eq!(
///     deobfuscate("contact: info [at] example [dot] com"),
///     "contact: info@example.com"
/// );
/// assert_eq!(deobfuscate("write to jo at shop dot test"), "write to jo@shop.test");
/// ```
pub fn deobfuscate(text: &str) -> String {
    let text = AT_BRACKETED.replace_all(text, "@");
    let text = DOT_BRACKETED.replace_all(&text, ".");

    SPACED_ADDRESS
        .replace_all(&text, |caps: &Captures| {
            format!("{}@{}", &caps[1], SPACED_DOT.replace_all(&caps[2], "."))
        })
        .into_owned()
}
