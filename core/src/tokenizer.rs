use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[A-Za-z]+").expect("valid regex");
}

/// Lazily split text into maximal runs of ASCII letters, lower-cased.
/// Anything else (digits, punctuation, whitespace, non-ASCII) separates tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    RE.find_iter(text).map(|m| m.as_str().to_ascii_lowercase())
}
