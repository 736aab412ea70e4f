use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentClass {
    Positive,
    Neutral,
    Negative,
}

impl SentimentClass {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            SentimentClass::Positive
        } else if polarity < 0.0 {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentClass::Positive => "positive",
            SentimentClass::Neutral => "neutral",
            SentimentClass::Negative => "negative",
        }
    }

    /// Drop-first dummy flags `(is_neutral, is_negative)`; positive is the
    /// baseline with both flags zero.
    pub fn one_hot(self) -> (f64, f64) {
        match self {
            SentimentClass::Positive => (0.0, 0.0),
            SentimentClass::Neutral => (1.0, 0.0),
            SentimentClass::Negative => (0.0, 1.0),
        }
    }
}

pub trait SentimentScorer: Send + Sync {
    /// Continuous polarity in [-1, 1].
    fn polarity(&self, text: &str) -> f64;
}

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("cool", 0.35),
    ("delighted", 0.7),
    ("easy", 0.43),
    ("excellent", 1.0),
    ("excited", 0.4),
    ("exciting", 0.3),
    ("fantastic", 0.4),
    ("fast", 0.2),
    ("favorite", 0.5),
    ("fresh", 0.3),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("impressive", 1.0),
    ("incredible", 0.9),
    ("innovative", 0.5),
    ("love", 0.5),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("powerful", 0.3),
    ("proud", 0.8),
    ("thrilled", 0.6),
    ("top", 0.5),
    ("win", 0.8),
    ("wonderful", 1.0),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("angry", -0.5),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("delay", -0.3),
    ("delayed", -0.3),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("fail", -0.5),
    ("failed", -0.5),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("issue", -0.2),
    ("poor", -0.4),
    ("problem", -0.3),
    ("sad", -0.5),
    ("slow", -0.3),
    ("sorry", -0.5),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const NEGATORS: &[&str] = &["not", "no", "never", "none", "nobody", "nothing", "neither", "nor"];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("super", 1.3),
    ("so", 1.2),
    ("truly", 1.2),
    ("incredibly", 1.4),
];

/// Lexicon scorer: each known word contributes its weight, a preceding negator
/// flips and halves it, and a preceding intensifier scales it. The polarity is
/// the mean contribution of the scored words.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconSentiment {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|token| !token.is_empty())
            .collect();

        let mut total = 0.0;
        let mut scored = 0usize;
        let mut negate = false;
        let mut intensity = 1.0;

        for token in tokens {
            if is_negator(token) {
                negate = true;
                continue;
            }
            if let Some(scale) = lookup(INTENSIFIERS, token) {
                intensity *= scale;
                continue;
            }

            let word = token.trim_matches('\'');
            let weight = lookup(POSITIVE_WORDS, word).or_else(|| lookup(NEGATIVE_WORDS, word));
            if let Some(weight) = weight {
                let mut value = (weight * intensity).clamp(-1.0, 1.0);
                if negate {
                    value *= -0.5;
                }
                total += value;
                scored += 1;
            }
            negate = false;
            intensity = 1.0;
        }

        if scored == 0 {
            return 0.0;
        }
        (total / scored as f64).clamp(-1.0, 1.0)
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
    table
        .iter()
        .find(|(entry, _)| *entry == word)
        .map(|(_, weight)| *weight)
}
