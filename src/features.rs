//! Training-time feature schema and the builder that mirrors it.
//!
//! The regression model consumes exactly [`FEATURE_COUNT`] values in the order
//! of [`FEATURE_NAMES`]. Reordering either list silently corrupts every
//! prediction, so the artifact loader compares its recorded feature names and
//! fingerprint against these before the model is accepted.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::signals::TextSignals;
use crate::vocabulary::CompanyLookup;
use crate::{normalize_hour, TweetRequest};

pub const FEATURE_COUNT: usize = 12;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "word_count",
    "char_count",
    "has_media",
    "hour",
    "company_code",
    "emoji_count",
    "has_url",
    "has_hashtag",
    "text_density",
    "company_avg_likes",
    "sentiment_neutral",
    "sentiment_negative",
];

pub const COMPANY_CODE_INDEX: usize = 4;

/// Stand-in for the vectorizer-derived density column the model was trained
/// with. It cannot be recomputed at serving time.
pub const DEFAULT_TEXT_DENSITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub word_count: f64,
    pub char_count: f64,
    pub has_media: f64,
    pub hour: f64,
    pub company_code: f64,
    pub emoji_count: f64,
    pub has_url: f64,
    pub has_hashtag: f64,
    pub text_density: f64,
    pub company_avg_likes: f64,
    pub sentiment_neutral: f64,
    pub sentiment_negative: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.word_count,
            self.char_count,
            self.has_media,
            self.hour,
            self.company_code,
            self.emoji_count,
            self.has_url,
            self.has_hashtag,
            self.text_density,
            self.company_avg_likes,
            self.sentiment_neutral,
            self.sentiment_negative,
        ]
    }

    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES
            .iter()
            .copied()
            .zip(self.to_array())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder {
    text_density: f64,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_DENSITY)
    }
}

impl FeatureBuilder {
    pub fn new(text_density: f64) -> Self {
        Self { text_density }
    }

    pub fn text_density(&self) -> f64 {
        self.text_density
    }

    pub fn build(
        &self,
        request: &TweetRequest,
        signals: &TextSignals,
        company: &CompanyLookup,
    ) -> FeatureVector {
        let (sentiment_neutral, sentiment_negative) = signals.sentiment.one_hot();
        FeatureVector {
            word_count: signals.word_count as f64,
            char_count: signals.char_count as f64,
            has_media: bool_to_f64(request.has_media),
            hour: normalize_hour(Some(i64::from(request.hour))) as f64,
            company_code: company.code as f64,
            emoji_count: signals.emoji_count as f64,
            has_url: bool_to_f64(signals.has_url),
            has_hashtag: bool_to_f64(signals.has_hashtag),
            text_density: self.text_density,
            company_avg_likes: company.average_likes,
            sentiment_neutral,
            sentiment_negative,
        }
    }
}

/// Hex of the first 8 bytes of SHA-256 over the `|`-joined feature names.
pub fn schema_fingerprint() -> String {
    fingerprint_of(&FEATURE_NAMES)
}

pub fn fingerprint_of<S: AsRef<str>>(names: &[S]) -> String {
    let joined = names
        .iter()
        .map(|name| name.as_ref())
        .collect::<Vec<_>>()
        .join("|");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    format!("{:016x}", u64::from_be_bytes(bytes))
}

fn bool_to_f64(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
