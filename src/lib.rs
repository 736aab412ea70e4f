pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod model;
pub mod predictor;
pub mod sentiment;
pub mod server;
pub mod signals;
pub mod templates;
pub mod vocabulary;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InferenceError;
use crate::features::FeatureVector;
use crate::predictor::Prediction;

pub use context::{EngagementContext, PipelineSettings};

pub const DEFAULT_HOUR: u8 = 12;
pub const DEFAULT_COMPANY: &str = "Our team";
pub const DEFAULT_TOPIC: &str = "something new";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweetType {
    Announcement,
    Question,
    General,
    Update,
}

impl TweetType {
    pub const DEFAULT: TweetType = TweetType::Announcement;

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "announcement" | "announce" => Some(TweetType::Announcement),
            "question" | "ask" => Some(TweetType::Question),
            "general" => Some(TweetType::General),
            "update" => Some(TweetType::Update),
            _ => None,
        }
    }

    /// Unrecognized or missing categories resolve to [`TweetType::DEFAULT`].
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::from_str).unwrap_or(Self::DEFAULT)
    }

    pub fn label(self) -> &'static str {
        match self {
            TweetType::Announcement => "announcement",
            TweetType::Question => "question",
            TweetType::General => "general",
            TweetType::Update => "update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetRequest {
    pub company: String,
    pub tweet_type: TweetType,
    pub topic: String,
    pub has_media: bool,
    pub hour: u8,
}

impl TweetRequest {
    pub fn new(company: &str, tweet_type: TweetType, topic: &str) -> Self {
        Self {
            company: company.to_string(),
            tweet_type,
            topic: topic.to_string(),
            has_media: false,
            hour: DEFAULT_HOUR,
        }
    }

    pub fn with_media(mut self, has_media: bool) -> Self {
        self.has_media = has_media;
        self
    }

    pub fn with_hour(mut self, hour: u8) -> Self {
        self.hour = normalize_hour(Some(hour as i64));
        self
    }
}

/// Request as it arrives from the outer boundary, before defaults are applied.
///
/// Fields are read leniently: a value of the wrong JSON type never fails
/// deserialization, it is kept raw and resolved to a default in `normalize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTweetRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, alias = "tweetType", deserialize_with = "lenient_text")]
    pub tweet_type: Option<String>,
    #[serde(default, alias = "topic", deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, alias = "hasMedia")]
    pub has_media: Option<Value>,
    #[serde(default)]
    pub hour: Option<Value>,
}

/// A default substituted while normalizing a request. Recorded, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    EmptyCompany,
    EmptyTopic,
    UnknownTweetType(String),
    MissingTweetType,
    HourOutOfRange(i64),
    MalformedHour(String),
    MissingHour,
    MalformedMedia(String),
}

impl RawTweetRequest {
    pub fn normalize(self) -> (TweetRequest, Vec<Validation>) {
        let mut notes = Vec::new();

        let company = non_empty(self.company).unwrap_or_else(|| {
            notes.push(Validation::EmptyCompany);
            DEFAULT_COMPANY.to_string()
        });
        let topic = non_empty(self.message).unwrap_or_else(|| {
            notes.push(Validation::EmptyTopic);
            DEFAULT_TOPIC.to_string()
        });

        let tweet_type = match self.tweet_type.as_deref() {
            Some(value) => TweetType::from_str(value).unwrap_or_else(|| {
                notes.push(Validation::UnknownTweetType(value.to_string()));
                TweetType::DEFAULT
            }),
            None => {
                notes.push(Validation::MissingTweetType);
                TweetType::DEFAULT
            }
        };

        let hour = match self.hour.as_ref() {
            None => {
                notes.push(Validation::MissingHour);
                None
            }
            Some(value) => match parse_hour(value) {
                Some(hour) => {
                    if !(0..=23).contains(&hour) {
                        notes.push(Validation::HourOutOfRange(hour));
                    }
                    Some(hour)
                }
                None => {
                    notes.push(Validation::MalformedHour(value.to_string()));
                    None
                }
            },
        };

        let has_media = match self.has_media.as_ref() {
            None => false,
            Some(value) => parse_flag(value).unwrap_or_else(|| {
                notes.push(Validation::MalformedMedia(value.to_string()));
                false
            }),
        };

        let request = TweetRequest {
            company,
            tweet_type,
            topic,
            has_media,
            hour: normalize_hour(hour),
        };
        (request, notes)
    }
}

/// Integral numbers, integral floats (`14.0`) and numeric strings (`"14"`).
fn parse_hour(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                    .map(|float| float as i64)
            })
        }
        _ => None,
    }
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 0.0 => Some(false),
            Some(n) if n == 1.0 => Some(true),
            _ => None,
        },
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

/// Missing or out-of-range hours fall back to [`DEFAULT_HOUR`].
pub fn normalize_hour(hour: Option<i64>) -> u8 {
    match hour {
        Some(value) if (0..=23).contains(&value) => value as u8,
        _ => DEFAULT_HOUR,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub generated_tweet: String,
    pub features: FeatureVector,
    pub prediction: Prediction,
}

/// Wire result handed to the boundary, success or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub success: bool,
    pub generated_tweet: String,
    pub predicted_likes: f64,
    pub error: Option<String>,
}

impl PredictionResult {
    pub fn success(generated_tweet: String, predicted_likes: f64) -> Self {
        Self {
            success: true,
            generated_tweet,
            predicted_likes,
            error: None,
        }
    }

    pub fn failure(generated_tweet: String, error: impl Into<String>) -> Self {
        Self {
            success: false,
            generated_tweet,
            predicted_likes: 0.0,
            error: Some(error.into()),
        }
    }

    pub fn from_outcome(generated_tweet: String, outcome: Result<Forecast, InferenceError>) -> Self {
        match outcome {
            Ok(forecast) => Self::success(forecast.generated_tweet, forecast.prediction.rounded),
            Err(err) => Self::failure(generated_tweet, err.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn format_likes(value: f64, rounding: predictor::Rounding) -> String {
    match rounding {
        predictor::Rounding::TwoDecimals => format!("{:.2}", value),
        predictor::Rounding::Integer => format!("{:.0}", value),
    }
}
