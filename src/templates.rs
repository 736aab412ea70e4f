use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::TweetType;

const COMPANY_SLOT: &str = "{company}";
const TOPIC_SLOT: &str = "{topic}";

/// Phrasing variants per tweet category. `{company}` and `{topic}` are
/// substituted at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSet {
    pub announcement: Vec<String>,
    pub question: Vec<String>,
    pub general: Vec<String>,
    pub update: Vec<String>,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            announcement: owned(&[
                "Exciting news! {company} is proud to announce {topic}. Stay tuned for more!",
                "Big announcement from {company}: {topic} is here!",
                "{company} is thrilled to share {topic} with you today.",
            ]),
            question: owned(&[
                "What do you think about {topic}? {company} wants to hear from you!",
                "Hey followers, how would {topic} change your day? Let {company} know below.",
                "Quick question from {company}: what excites you most about {topic}?",
            ]),
            general: owned(&[
                "{company} is all about {topic}. Join the conversation!",
                "At {company}, we keep thinking about {topic}.",
                "Here is what {company} has to say about {topic}.",
            ]),
            update: owned(&[
                "Update from {company}: {topic}. Thanks for your continued support!",
                "Quick update: {company} has news on {topic}.",
                "{company} update: {topic}. More details coming soon.",
            ]),
        }
    }
}

impl TemplateSet {
    pub fn variants(&self, tweet_type: TweetType) -> &[String] {
        match tweet_type {
            TweetType::Announcement => &self.announcement,
            TweetType::Question => &self.question,
            TweetType::General => &self.general,
            TweetType::Update => &self.update,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TweetGenerator {
    templates: TemplateSet,
}

impl TweetGenerator {
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Picks a phrasing variant with `rng` and fills in the slots. A category
    /// with no variants falls back to the built-in announcement phrasing.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        company: &str,
        tweet_type: TweetType,
        topic: &str,
    ) -> String {
        let template = self
            .templates
            .variants(tweet_type)
            .choose(rng)
            .map(|template| template.as_str())
            .unwrap_or(FALLBACK_TEMPLATE);
        render(template, company, topic)
    }
}

const FALLBACK_TEMPLATE: &str =
    "Exciting news! {company} is proud to announce {topic}. Stay tuned for more!";

pub fn render(template: &str, company: &str, topic: &str) -> String {
    template
        .replace(COMPANY_SLOT, company)
        .replace(TOPIC_SLOT, topic)
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
