use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ArtifactError, ModelError, Result};
use crate::features::{schema_fingerprint, FEATURE_COUNT, FEATURE_NAMES};

/// A trained regression model consumed as a `predict(vector) -> score` oracle.
pub trait RegressionModel: Send + Sync {
    fn expected_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, features: &[f64]) -> std::result::Result<f64, ModelError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    pub schema_version: String,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub schema_fingerprint: Option<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    schema_version: String,
    intercept: f64,
    coefficients: [f64; FEATURE_COUNT],
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: [f64; FEATURE_COUNT]) -> Self {
        Self {
            schema_version: "unversioned".to_string(),
            intercept,
            coefficients,
        }
    }

    pub fn from_artifact(artifact: LinearModelArtifact) -> std::result::Result<Self, ModelError> {
        if artifact.feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::SchemaMismatch(format!(
                "artifact lists {} features, expected {}",
                artifact.feature_names.len(),
                FEATURE_COUNT
            )));
        }
        for (index, (found, expected)) in artifact
            .feature_names
            .iter()
            .zip(FEATURE_NAMES.iter())
            .enumerate()
        {
            if found.as_str() != *expected {
                return Err(ModelError::SchemaMismatch(format!(
                    "feature {} is {}, expected {}",
                    index, found, expected
                )));
            }
        }
        if let Some(recorded) = artifact.schema_fingerprint.as_deref() {
            if !recorded.eq_ignore_ascii_case(&schema_fingerprint()) {
                return Err(ModelError::SchemaMismatch(format!(
                    "fingerprint {} does not match {}",
                    recorded,
                    schema_fingerprint()
                )));
            }
        }

        let coefficients: [f64; FEATURE_COUNT] = artifact
            .coefficients
            .as_slice()
            .try_into()
            .map_err(|_| ModelError::ShapeMismatch {
                expected: FEATURE_COUNT,
                actual: artifact.coefficients.len(),
            })?;
        if !artifact.intercept.is_finite() || coefficients.iter().any(|value| !value.is_finite()) {
            return Err(ModelError::Artifact(
                "artifact contains non-finite weights".to_string(),
            ));
        }

        Ok(Self {
            schema_version: artifact.schema_version,
            intercept: artifact.intercept,
            coefficients,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        let data = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: shown.clone(),
            source,
        })?;
        let artifact: LinearModelArtifact =
            serde_json::from_str(&data).map_err(|source| ArtifactError::Parse {
                path: shown.clone(),
                source,
            })?;
        let model = Self::from_artifact(artifact)?;
        tracing::info!(
            path = %shown,
            schema_version = %model.schema_version,
            "loaded regression model"
        );
        Ok(model)
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &[f64]) -> std::result::Result<f64, ModelError> {
        if features.len() != FEATURE_COUNT {
            return Err(ModelError::ShapeMismatch {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }
        let score = features
            .iter()
            .zip(self.coefficients.iter())
            .fold(self.intercept, |acc, (value, weight)| acc + value * weight);
        Ok(score)
    }
}
