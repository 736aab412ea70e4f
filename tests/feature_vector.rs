use std::io::Write;

use tweet_engagement::error::{ArtifactError, ModelError};
use tweet_engagement::features::{
    schema_fingerprint, FeatureBuilder, COMPANY_CODE_INDEX, FEATURE_COUNT, FEATURE_NAMES,
};
use tweet_engagement::model::{LinearModel, LinearModelArtifact, RegressionModel};
use tweet_engagement::sentiment::SentimentScorer;
use tweet_engagement::signals::TextSignals;
use tweet_engagement::vocabulary::{
    CompanyEntry, CompanyVocabulary, LookupMiss, VocabularySnapshot, UNKNOWN_COMPANY_CODE,
};
use tweet_engagement::{TweetRequest, TweetType, DEFAULT_HOUR};

struct FixedPolarity(f64);

impl SentimentScorer for FixedPolarity {
    fn polarity(&self, _text: &str) -> f64 {
        self.0
    }
}

fn vocabulary(fallback: f64) -> CompanyVocabulary {
    CompanyVocabulary::from_snapshot(VocabularySnapshot {
        fallback_average_likes: fallback,
        companies: vec![
            CompanyEntry {
                name: "Nike".to_string(),
                code: 7,
                average_likes: 587.3,
            },
            CompanyEntry {
                name: "tesla".to_string(),
                code: 12,
                average_likes: 1210.8,
            },
        ],
    })
    .expect("valid vocabulary")
}

fn artifact() -> LinearModelArtifact {
    LinearModelArtifact {
        schema_version: "test".to_string(),
        feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        schema_fingerprint: Some(schema_fingerprint()),
        intercept: 1.0,
        coefficients: vec![0.0; FEATURE_COUNT],
    }
}

#[test]
fn builds_features_in_training_order() {
    let vocabulary = vocabulary(0.0);
    let request = TweetRequest::new("Nike", TweetType::Announcement, "new shoes")
        .with_media(true)
        .with_hour(14);
    let signals = TextSignals::extract("Launch day 🚀 #shoes https://nike.com/x", &FixedPolarity(0.4));
    let company = vocabulary.lookup(&request.company);

    let features = FeatureBuilder::new(0.1).build(&request, &signals, &company);

    assert_eq!(
        features.to_array(),
        [5.0, 38.0, 1.0, 14.0, 7.0, 1.0, 1.0, 1.0, 0.1, 587.3, 0.0, 0.0]
    );
}

#[test]
fn hour_set_directly_is_still_clamped() {
    let vocabulary = vocabulary(0.0);
    let request = TweetRequest {
        hour: 99,
        ..TweetRequest::new("Nike", TweetType::Update, "restock")
    };
    let signals = TextSignals::extract("restock", &FixedPolarity(0.0));
    let company = vocabulary.lookup(&request.company);

    let features = FeatureBuilder::default().build(&request, &signals, &company);
    assert_eq!(features.hour, f64::from(DEFAULT_HOUR));

    let request = TweetRequest { hour: 23, ..request };
    let features = FeatureBuilder::default().build(&request, &signals, &company);
    assert_eq!(features.hour, 23.0);
}

#[test]
fn company_code_never_shifts() {
    let vocabulary = vocabulary(0.0);
    let builder = FeatureBuilder::default();
    let cases = [
        ("Tesla", "", 0.0, 12.0),
        ("nike", "😀 #tag www.example.com lots of words here", -0.9, 7.0),
        ("unknown_co", "plain", 0.3, 0.0),
    ];

    for (company, text, polarity, expected_code) in cases {
        let request = TweetRequest::new(company, TweetType::General, "topic");
        let signals = TextSignals::extract(text, &FixedPolarity(polarity));
        let features = builder.build(&request, &signals, &vocabulary.lookup(company));
        let values = features.to_array();
        assert_eq!(values.len(), FEATURE_COUNT);
        assert_eq!(values[COMPANY_CODE_INDEX], expected_code);
        assert_eq!(features.named()[COMPANY_CODE_INDEX].0, "company_code");
    }
}

#[test]
fn sentiment_flags_are_drop_first() {
    let vocabulary = vocabulary(0.0);
    let builder = FeatureBuilder::default();
    let request = TweetRequest::new("Nike", TweetType::Question, "topic");
    let company = vocabulary.lookup("Nike");

    let flags = |polarity: f64| {
        let signals = TextSignals::extract("text", &FixedPolarity(polarity));
        let values = builder.build(&request, &signals, &company).to_array();
        (values[10], values[11])
    };

    assert_eq!(flags(0.4), (0.0, 0.0));
    assert_eq!(flags(-0.3), (0.0, 1.0));
    assert_eq!(flags(0.0), (1.0, 0.0));
}

#[test]
fn unknown_company_uses_sentinel() {
    let vocabulary = vocabulary(150.0);
    let lookup = vocabulary.lookup("unknown_co");

    assert_eq!(lookup.code, UNKNOWN_COMPANY_CODE);
    assert_eq!(lookup.average_likes, 150.0);
    assert_eq!(lookup.miss, Some(LookupMiss::UnknownCompany));
    assert_eq!(vocabulary.encode_company("unknown_co"), 0);
    assert_eq!(vocabulary.average_likes("unknown_co"), 150.0);

    let empty = vocabulary.lookup("   ");
    assert_eq!(empty.code, 0);
    assert_eq!(empty.miss, Some(LookupMiss::EmptyName));
}

#[test]
fn company_lookup_normalizes_names() {
    let vocabulary = vocabulary(0.0);
    assert_eq!(vocabulary.encode_company("  NIKE "), 7);
    assert_eq!(vocabulary.average_likes("TeSlA"), 1210.8);
    assert!(vocabulary.lookup("nike").is_known());
}

#[test]
fn vocabulary_rejects_inconsistent_snapshots() {
    let duplicate = CompanyVocabulary::from_snapshot(VocabularySnapshot {
        fallback_average_likes: 0.0,
        companies: vec![
            CompanyEntry {
                name: "Nike".to_string(),
                code: 1,
                average_likes: 1.0,
            },
            CompanyEntry {
                name: " nike".to_string(),
                code: 2,
                average_likes: 2.0,
            },
        ],
    });
    assert!(matches!(duplicate, Err(ArtifactError::Vocabulary(_))));

    let reserved = CompanyVocabulary::from_snapshot(VocabularySnapshot {
        fallback_average_likes: 0.0,
        companies: vec![CompanyEntry {
            name: "Nike".to_string(),
            code: 0,
            average_likes: 1.0,
        }],
    });
    assert!(matches!(reserved, Err(ArtifactError::Vocabulary(_))));
}

#[test]
fn schema_fingerprint_is_pinned() {
    assert_eq!(schema_fingerprint(), "e156c98ba284f786");
}

#[test]
fn linear_model_predicts_dot_product() {
    let mut coefficients = [0.0; FEATURE_COUNT];
    coefficients[0] = 2.0;
    coefficients[2] = 10.0;
    let model = LinearModel::new(5.0, coefficients);

    let mut features = [0.0; FEATURE_COUNT];
    features[0] = 3.0;
    features[2] = 1.0;
    let score = model.predict(&features).expect("prediction");
    assert!((score - 21.0).abs() < 1e-9);

    let err = model.predict(&features[..11]).unwrap_err();
    assert_eq!(
        err,
        ModelError::ShapeMismatch {
            expected: FEATURE_COUNT,
            actual: 11
        }
    );
}

#[test]
fn linear_model_rejects_reordered_schema() {
    let mut swapped = artifact();
    swapped.feature_names.swap(10, 11);
    assert!(matches!(
        LinearModel::from_artifact(swapped),
        Err(ModelError::SchemaMismatch(_))
    ));

    let mut fingerprint = artifact();
    fingerprint.schema_fingerprint = Some("0000000000000000".to_string());
    assert!(matches!(
        LinearModel::from_artifact(fingerprint),
        Err(ModelError::SchemaMismatch(_))
    ));

    let mut short = artifact();
    short.coefficients.pop();
    assert!(matches!(
        LinearModel::from_artifact(short),
        Err(ModelError::ShapeMismatch { .. })
    ));

    assert!(LinearModel::from_artifact(artifact()).is_ok());
}

#[test]
fn loads_artifacts_from_disk() {
    let mut model_file = tempfile::NamedTempFile::new().expect("temp file");
    let payload = serde_json::to_string(&artifact()).expect("serialize artifact");
    model_file.write_all(payload.as_bytes()).expect("write artifact");
    let model = LinearModel::load(model_file.path()).expect("load model");
    assert_eq!(model.schema_version(), "test");

    let mut vocab_file = tempfile::NamedTempFile::new().expect("temp file");
    vocab_file
        .write_all(br#"{"companies":[{"name":"Apple","code":3,"average_likes":1045.2}]}"#)
        .expect("write vocabulary");
    let vocabulary = CompanyVocabulary::load(vocab_file.path()).expect("load vocabulary");
    assert_eq!(vocabulary.len(), 1);
    assert_eq!(vocabulary.encode_company("apple"), 3);
    assert_eq!(vocabulary.fallback_average_likes(), 0.0);

    let mut broken = tempfile::NamedTempFile::new().expect("temp file");
    broken.write_all(b"{not json").expect("write broken");
    assert!(matches!(
        CompanyVocabulary::load(broken.path()),
        Err(ArtifactError::Parse { .. })
    ));
}
