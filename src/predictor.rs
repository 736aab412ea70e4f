use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{InferenceError, ModelError};
use crate::features::FeatureVector;
use crate::model::RegressionModel;

/// How the raw regression output is presented. Chosen once per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    #[default]
    TwoDecimals,
    Integer,
}

impl Rounding {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "two_decimals" | "decimals" | "2" => Some(Rounding::TwoDecimals),
            "integer" | "int" | "count" | "0" => Some(Rounding::Integer),
            _ => None,
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::TwoDecimals => (value * 100.0).round() / 100.0,
            Rounding::Integer => value.round(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub raw: f64,
    pub rounded: f64,
}

#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn RegressionModel>,
    rounding: Rounding,
}

impl Predictor {
    pub fn new(model: Arc<dyn RegressionModel>, rounding: Rounding) -> Self {
        Self { model, rounding }
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let values = features.to_array();
        let expected = self.model.expected_features();
        if values.len() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: values.len(),
            }
            .into());
        }
        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(ModelError::NonFinite { index }.into());
        }

        let raw = self.model.predict(&values)?;
        if !raw.is_finite() {
            return Err(ModelError::UnusableOutput(raw).into());
        }

        let rounded = self.rounding.apply(raw);
        if !rounded.is_finite() {
            return Err(ModelError::UnusableOutput(raw).into());
        }

        Ok(Prediction { raw, rounded })
    }
}
