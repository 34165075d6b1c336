//! Text-level signals used by the continuity analyzer.
//!
//! These helpers look only at surface features of the text (punctuation,
//! letter case, leading connectors, shared vocabulary); there is no language
//! model behind them.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Sentence-final punctuation, optionally followed by closing quotes or brackets
    static ref RE_TERMINAL: Regex = Regex::new(r#"[.!?…]['"”’)\]»]*$"#).unwrap();

    /// A continuation connector as the first word
    static ref RE_CONNECTOR: Regex = Regex::new(
        r#"(?i)^[\s\p{Pi}\p{Ps}'"]*(and|but|or|nor|yet|so|however|moreover|furthermore|therefore|thus|hence|meanwhile|also|additionally|then|which|while|although|though|because|whereas|besides|instead|otherwise)\b"#
    )
    .unwrap();

    /// Word tokens, keeping inner apostrophes
    static ref RE_WORD: Regex = Regex::new(r"[\p{L}\p{N}]+(?:['’]\p{L}+)?").unwrap();

    /// Generic words that carry no topical signal
    static ref STOP_WORDS: HashSet<&'static str> = [
        "about", "above", "after", "again", "against", "also", "although", "among", "another",
        "because", "been", "before", "being", "below", "between", "both", "cannot", "could",
        "does", "doing", "down", "during", "each", "even", "every", "from", "further", "have",
        "having", "here", "into", "itself", "just", "many", "more", "most", "much", "must",
        "never", "only", "other", "over", "same", "should", "since", "some", "still", "such",
        "than", "that", "their", "them", "then", "there", "these", "they", "this", "those",
        "through", "under", "until", "upon", "very", "were", "what", "when", "where", "which",
        "while", "with", "within", "without", "would", "your", "will", "said", "says",
    ]
    .into_iter()
    .collect();
}

/// Check whether text ends without sentence-final punctuation.
///
/// Empty text has no tail to continue and returns `false`.
///
/// # Examples
///
/// ```
/// use page_flow::continuity::signals::lacks_terminal_punctuation;
///
/// assert!(lacks_terminal_punctuation("...thanks to the unwavering"));
/// assert!(!lacks_terminal_punctuation("It was over."));
/// assert!(!lacks_terminal_punctuation("\"Never,\" she said.\""));
/// ```
pub fn lacks_terminal_punctuation(text: &str) -> bool {
    let trimmed = text.trim_end();
    !trimmed.is_empty() && !RE_TERMINAL.is_match(trimmed)
}

/// Check whether the first letter or digit of the text is a lowercase letter.
pub fn starts_lowercase(text: &str) -> bool {
    text.chars()
        .find(|c| c.is_alphanumeric())
        .map_or(false, |c| c.is_lowercase())
}

/// Check whether the text opens with a continuation connector ("and", "however", ...).
pub fn starts_with_connector(text: &str) -> bool {
    RE_CONNECTOR.is_match(text)
}

/// Lowercased topical words: at least four letters and not a stop word.
pub fn content_words(text: &str) -> Vec<String> {
    RE_WORD
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().count() >= 4 && !STOP_WORDS.contains(w.as_str()))
        .collect()
}

/// Number of distinct content words shared by the end of `tail` and the start of `head`.
///
/// Only the last `window` words of `tail` and the first `window` words of
/// `head` are compared.
pub fn shared_content_words(tail: &str, head: &str, window: usize) -> usize {
    let tail_words = content_words(tail);
    let head_words = content_words(head);

    let tail_set: HashSet<&str> = tail_words
        .iter()
        .skip(tail_words.len().saturating_sub(window))
        .map(String::as_str)
        .collect();
    let head_set: HashSet<&str> = head_words.iter().take(window).map(String::as_str).collect();

    tail_set.intersection(&head_set).count()
}

/// Check whether text looks like a title: short, capitalized, not a sentence fragment.
///
/// # Examples
///
/// ```
/// use page_flow::continuity::signals::is_title_like;
///
/// assert!(is_title_like("The Long Road Home", 12));
/// assert!(is_title_like("2025 in Review", 12));
/// assert!(!is_title_like("and then it rained.", 12));
/// ```
pub fn is_title_like(text: &str, max_words: usize) -> bool {
    let trimmed = text.trim();
    let starts_upper = trimmed
        .chars()
        .find(|c| c.is_alphanumeric())
        .map_or(false, |c| c.is_uppercase() || c.is_numeric());
    let ends_open = matches!(trimmed.chars().last(), Some('.') | Some(',') | Some(';'));

    starts_upper && !ends_open && trimmed.split_whitespace().count() <= max_words
}
