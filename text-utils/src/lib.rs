//! Small text helpers shared by the HTTP handlers.
//!
//! - [`clean_text`] normalizes user input before it reaches the LLM.
//! - [`extract_keywords`] pulls a short, ordered list of significant words
//!   out of a model answer.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Default number of keywords returned by handlers.
pub const DEFAULT_MAX_KEYWORDS: usize = 5;

/// Words that never count as keywords.
const STOP_WORDS: &[&str] = &[
    "the", "and", "but", "for", "with", "this", "that", "will", "you", "are", "was", "were",
];

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static UNSAFE_CHARS_RE: OnceLock<Regex> = OnceLock::new();
static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn unsafe_chars_re() -> &'static Regex {
    UNSAFE_CHARS_RE.get_or_init(|| Regex::new(r#"[<>"']"#).expect("valid unsafe-chars regex"))
}

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"\b[a-z]{3,}\b").expect("valid word regex"))
}

/// Cleans and normalizes free-form text input.
///
/// Trims, collapses every whitespace run into a single space and strips
/// `<`, `>`, `"` and `'`. Returns an empty string when nothing is left.
///
/// ```
/// assert_eq!(text_utils::clean_text("  what   is\n<b>x</b> "), "what is bx/b");
/// ```
pub fn clean_text(text: &str) -> String {
    let collapsed = whitespace_re().replace_all(text.trim(), " ");
    let stripped = unsafe_chars_re().replace_all(&collapsed, "");
    // Stripping may leave a stray edge space, e.g. `"< x"`.
    stripped.trim().to_string()
}

/// Extracts up to `max_keywords` significant words from `text`.
///
/// Words are lowercased ASCII alphabetic runs of length 3 or more, stop words
/// are dropped, and duplicates keep their first position.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    if text.is_empty() || max_keywords == 0 {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(max_keywords);

    for m in word_re().find_iter(&lowered) {
        let word = m.as_str();
        if STOP_WORDS.contains(&word) || !seen.insert(word) {
            continue;
        }
        out.push(word.to_string());
        if out.len() == max_keywords {
            break;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  What\tis \n\n a   derivative? "), "What is a derivative?");
    }

    #[test]
    fn clean_text_strips_markup_and_quotes() {
        assert_eq!(clean_text(r#"<script>"hi"</script>"#), "scripthi/script");
        assert_eq!(clean_text("Newton's law"), "Newtons law");
    }

    #[test]
    fn clean_text_of_blank_is_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \t\n "), "");
        assert_eq!(clean_text(" <> "), "");
    }

    #[test]
    fn keywords_skip_short_and_stop_words() {
        let kws = extract_keywords("A derivative measures rate of change.", DEFAULT_MAX_KEYWORDS);
        assert_eq!(kws, vec!["derivative", "measures", "rate", "change"]);
    }

    #[test]
    fn keywords_are_unique_and_capped() {
        let text = "Energy energy ENERGY mass velocity momentum force torque work";
        let kws = extract_keywords(text, 5);
        assert_eq!(kws, vec!["energy", "mass", "velocity", "momentum", "force"]);
    }

    #[test]
    fn keywords_ignore_digits_and_non_ascii() {
        let kws = extract_keywords("The 3rd law: αβγ and the sum2 total", 5);
        assert_eq!(kws, vec!["law", "total"]);
    }

    #[test]
    fn keywords_of_empty_text() {
        assert!(extract_keywords("", 5).is_empty());
        assert!(extract_keywords("something", 0).is_empty());
    }
}
