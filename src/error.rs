use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("feature vector has {actual} fields, model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("feature at index {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("model returned an unusable score: {0}")]
    UnusableOutput(f64),

    #[error("model schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("model failure: {0}")]
    Artifact(String),
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid vocabulary: {0}")]
    Vocabulary(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ArtifactError>;
