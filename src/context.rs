//! Process-wide engagement context and the request pipeline.
//!
//! The context is built once at startup and shared by reference (usually via
//! `Arc`). Nothing in it is mutated after construction, so concurrent requests
//! read it without locking; each request brings its own random source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::config::{AppConfig, ScoreText};
use crate::error::{InferenceError, Result};
use crate::features::FeatureBuilder;
use crate::model::{LinearModel, RegressionModel};
use crate::predictor::{Predictor, Rounding};
use crate::sentiment::{LexiconSentiment, SentimentScorer};
use crate::signals::TextSignals;
use crate::templates::TweetGenerator;
use crate::vocabulary::CompanyVocabulary;
use crate::{Forecast, PredictionResult, RawTweetRequest, TweetRequest, Validation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub score_text: ScoreText,
    pub rounding: Rounding,
    pub text_density: f64,
    pub template_seed: Option<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let config = crate::config::PipelineConfig::default();
        Self {
            score_text: config.score_text,
            rounding: config.rounding,
            text_density: config.text_density,
            template_seed: config.template_seed,
        }
    }
}

pub struct EngagementContext {
    vocabulary: CompanyVocabulary,
    predictor: Predictor,
    sentiment: Box<dyn SentimentScorer>,
    generator: TweetGenerator,
    builder: FeatureBuilder,
    settings: PipelineSettings,
}

impl EngagementContext {
    pub fn new(
        vocabulary: CompanyVocabulary,
        model: Arc<dyn RegressionModel>,
        generator: TweetGenerator,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            vocabulary,
            predictor: Predictor::new(model, settings.rounding),
            sentiment: Box::new(LexiconSentiment::new()),
            generator,
            builder: FeatureBuilder::new(settings.text_density),
            settings,
        }
    }

    pub fn with_sentiment(mut self, scorer: Box<dyn SentimentScorer>) -> Self {
        self.sentiment = scorer;
        self
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let vocabulary = CompanyVocabulary::load(&config.artifacts.vocabulary_path)?;
        let model = LinearModel::load(&config.artifacts.model_path)?;
        let settings = PipelineSettings {
            score_text: config.pipeline.score_text,
            rounding: config.pipeline.rounding,
            text_density: config.pipeline.text_density,
            template_seed: config.pipeline.template_seed,
        };
        Ok(Self::new(
            vocabulary,
            Arc::new(model),
            TweetGenerator::new(config.templates.clone()),
            settings,
        ))
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn vocabulary(&self) -> &CompanyVocabulary {
        &self.vocabulary
    }

    pub fn generate<R: Rng + ?Sized>(&self, request: &TweetRequest, rng: &mut R) -> String {
        self.generator
            .generate(rng, &request.company, request.tweet_type, &request.topic)
    }

    pub fn signals(&self, text: &str) -> TextSignals {
        TextSignals::extract(text, self.sentiment.as_ref())
    }

    /// Scores an already generated tweet for `request`.
    pub fn score(
        &self,
        request: &TweetRequest,
        generated_tweet: String,
    ) -> std::result::Result<Forecast, InferenceError> {
        let text = match self.settings.score_text {
            ScoreText::Generated => generated_tweet.as_str(),
            ScoreText::Message => request.topic.as_str(),
        };
        let signals = self.signals(text);
        let company = self.vocabulary.lookup(&request.company);
        if let Some(miss) = company.miss {
            tracing::warn!(
                company = %request.company,
                reason = miss.reason(),
                "company resolved to unknown sentinel"
            );
        }

        let features = self.builder.build(request, &signals, &company);
        tracing::debug!(features = ?features.to_array(), "built feature vector");

        let prediction = self.predictor.predict(&features)?;
        Ok(Forecast {
            generated_tweet,
            features,
            prediction,
        })
    }

    pub fn forecast<R: Rng + ?Sized>(
        &self,
        request: &TweetRequest,
        rng: &mut R,
    ) -> std::result::Result<Forecast, InferenceError> {
        let generated_tweet = self.generate(request, rng);
        self.score(request, generated_tweet)
    }

    /// Boundary call: always yields a well-formed result.
    pub fn respond<R: Rng + ?Sized>(&self, request: &TweetRequest, rng: &mut R) -> PredictionResult {
        let generated_tweet = self.generate(request, rng);
        let outcome = self.score(request, generated_tweet.clone());
        if let Err(err) = &outcome {
            tracing::warn!(error = %err, company = %request.company, "inference failed");
        }
        PredictionResult::from_outcome(generated_tweet, outcome)
    }

    /// Normalizes a raw request and responds with the configured random source:
    /// the fixed template seed when one is set, otherwise fresh entropy.
    pub fn respond_raw(&self, raw: RawTweetRequest) -> PredictionResult {
        let (request, _) = self.normalize_request(raw);
        match self.settings.template_seed {
            Some(seed) => self.respond(&request, &mut StdRng::seed_from_u64(seed)),
            None => self.respond(&request, &mut rand::thread_rng()),
        }
    }

    /// Applies request defaults and logs every substitution made.
    pub fn normalize_request(&self, raw: RawTweetRequest) -> (TweetRequest, Vec<Validation>) {
        let (request, notes) = raw.normalize();
        for note in &notes {
            tracing::debug!(?note, company = %request.company, "request default applied");
        }
        (request, notes)
    }
}
