//! Lexical and structural signals computed from a single piece of text.
//!
//! Every function here is total: empty strings, odd Unicode and malformed
//! input degrade to zero/false instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sentiment::{SentimentClass, SentimentScorer};

/// Inclusive code point ranges counted as emoji. The ranges are disjoint, so a
/// code point is counted at most once.
pub const EMOJI_RANGES: [(u32, u32); 4] = [
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport and map
    (0x1F1E0, 0x1F1FF), // regional indicators (flags)
];

const URL_PREFIXES: [&str; 3] = ["https://", "http://", "www."];

const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

static HASHTAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\w+").expect("hashtag regex"));

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://|www\.)[^\s<>]+|\b[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}/[^\s<>]*",
    )
    .expect("url regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct TextSignals {
    pub word_count: usize,
    pub char_count: usize,
    pub emoji_count: usize,
    pub has_url: bool,
    pub has_hashtag: bool,
    pub polarity: f64,
    pub sentiment: SentimentClass,
}

impl TextSignals {
    pub fn extract(text: &str, scorer: &dyn SentimentScorer) -> Self {
        let polarity = sentiment_polarity(text, scorer);
        Self {
            word_count: word_count(text),
            char_count: char_count(text),
            emoji_count: emoji_count(text),
            has_url: has_url(text),
            has_hashtag: has_hashtag(text),
            polarity,
            sentiment: SentimentClass::from_polarity(polarity),
        }
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length in Unicode scalar values, not bytes.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn is_emoji(ch: char) -> bool {
    let code = ch as u32;
    EMOJI_RANGES
        .iter()
        .any(|(start, end)| code >= *start && code <= *end)
}

pub fn emoji_count(text: &str) -> usize {
    text.chars().filter(|ch| is_emoji(*ch)).count()
}

pub fn has_hashtag(text: &str) -> bool {
    HASHTAG_PATTERN.is_match(text)
}

/// URL-looking substrings with trailing sentence punctuation removed.
pub fn extract_urls(text: &str) -> Vec<&str> {
    URL_PATTERN
        .find_iter(text)
        .map(|found| found.as_str().trim_end_matches(URL_TRAILING_PUNCTUATION))
        .filter(|url| has_host(url))
        .collect()
}

/// Scheme and `www.` prefixed matches only need something after the prefix;
/// bare domains must still carry a dot once punctuation is trimmed.
fn has_host(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    for prefix in URL_PREFIXES {
        if let Some(rest) = lowered.strip_prefix(prefix) {
            return !rest.is_empty();
        }
    }
    url.contains('.')
}

pub fn has_url(text: &str) -> bool {
    !extract_urls(text).is_empty()
}

/// Polarity from the injected scorer, forced into [-1, 1]. NaN becomes neutral.
pub fn sentiment_polarity(text: &str, scorer: &dyn SentimentScorer) -> f64 {
    let polarity = scorer.polarity(text);
    if polarity.is_nan() {
        return 0.0;
    }
    polarity.clamp(-1.0, 1.0)
}
