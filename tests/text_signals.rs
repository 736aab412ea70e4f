use tweet_engagement::sentiment::{LexiconSentiment, SentimentClass, SentimentScorer};
use tweet_engagement::signals::{
    char_count, emoji_count, extract_urls, has_hashtag, has_url, sentiment_polarity, word_count,
    TextSignals,
};

struct FixedPolarity(f64);

impl SentimentScorer for FixedPolarity {
    fn polarity(&self, _text: &str) -> f64 {
        self.0
    }
}

#[test]
fn counts_words_and_chars() {
    assert_eq!(word_count("  hello   world "), 2);
    assert_eq!(word_count(""), 0);
    assert_eq!(word_count("one\ttwo\nthree"), 3);
    assert_eq!(char_count("héllo"), 5);
    assert_eq!(char_count(""), 0);
}

#[test]
fn counts_emoji_in_defined_ranges_only() {
    assert_eq!(emoji_count(""), 0);
    assert_eq!(emoji_count("plain text"), 0);
    assert_eq!(emoji_count("launch 🚀"), 1);
    assert_eq!(emoji_count("😀🌍"), 2);
    // flags are two regional indicators
    assert_eq!(emoji_count("🇺🇸"), 2);
    // outside the pictograph ranges
    assert_eq!(emoji_count("☀ ❤ ✓"), 0);
}

#[test]
fn adding_one_emoji_increments_count_by_one() {
    let samples = ["", "hello", "new shoes 👟 today", "🇫🇷 bonjour", "é ü ß"];
    for sample in samples {
        let before = emoji_count(sample);
        let extended = format!("{}😀", sample);
        assert_eq!(emoji_count(&extended), before + 1, "sample {:?}", sample);
    }
}

#[test]
fn detects_hashtags() {
    assert!(has_hashtag("launch #newproduct today"));
    assert!(has_hashtag("#1 in sales"));
    assert!(!has_hashtag("no tags here"));
    assert!(!has_hashtag("a lone # sign"));
    assert!(!has_hashtag(""));
}

#[test]
fn detects_urls() {
    assert!(has_url("see https://example.com/x"));
    assert!(has_url("visit www.example.com today"));
    assert!(has_url("docs at example.com/start"));
    assert!(!has_url("plain text"));
    assert!(!has_url("end of sentence.Next one"));
    assert!(!has_url(""));
}

#[test]
fn scheme_urls_need_no_dotted_host() {
    assert!(has_url("docs at http://localhost:8080/docs"));
    assert!(has_url("wiki: http://intranet/x"));
    assert_eq!(
        extract_urls("see http://localhost:8080/docs."),
        vec!["http://localhost:8080/docs"]
    );
    assert!(!has_url("just http:// and nothing"));
}

#[test]
fn strips_trailing_punctuation_from_urls() {
    assert_eq!(
        extract_urls("Read it (https://example.com/post)."),
        vec!["https://example.com/post"]
    );
    assert_eq!(extract_urls("Go to www.example.com!"), vec!["www.example.com"]);
}

#[test]
fn lexicon_sentiment_has_expected_signs() {
    let scorer = LexiconSentiment::new();
    assert!(scorer.polarity("This is a great day") > 0.0);
    assert!(scorer.polarity("What a terrible delay") < 0.0);
    assert_eq!(scorer.polarity("The meeting is at noon"), 0.0);
    assert_eq!(scorer.polarity(""), 0.0);
    assert!(scorer.polarity("this is not good") < 0.0);
    assert!(scorer.polarity("I don't hate it") > 0.0);
    assert!(scorer.polarity("very good") > scorer.polarity("good"));
}

#[test]
fn lexicon_sentiment_stays_in_range() {
    let scorer = LexiconSentiment::new();
    let texts = [
        "extremely extremely extremely awesome",
        "worst worst awful horrible",
        "🚀🚀🚀",
        "\u{0}\u{FFFD}",
    ];
    for text in texts {
        let polarity = scorer.polarity(text);
        assert!((-1.0..=1.0).contains(&polarity), "{} -> {}", text, polarity);
    }
}

#[test]
fn polarity_buckets_into_three_classes() {
    assert_eq!(SentimentClass::from_polarity(0.4), SentimentClass::Positive);
    assert_eq!(SentimentClass::from_polarity(-0.3), SentimentClass::Negative);
    assert_eq!(SentimentClass::from_polarity(0.0), SentimentClass::Neutral);

    assert_eq!(SentimentClass::Positive.one_hot(), (0.0, 0.0));
    assert_eq!(SentimentClass::Negative.one_hot(), (0.0, 1.0));
    assert_eq!(SentimentClass::Neutral.one_hot(), (1.0, 0.0));
}

#[test]
fn out_of_range_polarity_is_clamped() {
    assert_eq!(sentiment_polarity("x", &FixedPolarity(3.0)), 1.0);
    assert_eq!(sentiment_polarity("x", &FixedPolarity(-7.5)), -1.0);
    assert_eq!(sentiment_polarity("x", &FixedPolarity(f64::NAN)), 0.0);
}

#[test]
fn extract_bundles_all_signals() {
    let signals = TextSignals::extract("Launch day 🚀 #shoes https://nike.com/x", &FixedPolarity(-0.2));
    assert_eq!(signals.word_count, 5);
    assert_eq!(signals.char_count, 38);
    assert_eq!(signals.emoji_count, 1);
    assert!(signals.has_url);
    assert!(signals.has_hashtag);
    assert_eq!(signals.sentiment, SentimentClass::Negative);
}
