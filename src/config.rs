use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::features::DEFAULT_TEXT_DENSITY;
use crate::predictor::Rounding;
use crate::templates::TemplateSet;

/// Which text the feature vector is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreText {
    #[default]
    Generated,
    Message,
}

impl ScoreText {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "generated" | "tweet" => Some(ScoreText::Generated),
            "message" | "raw" | "topic" => Some(ScoreText::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub model_path: PathBuf,
    pub vocabulary_path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("artifacts/model.json"),
            vocabulary_path: PathBuf::from("artifacts/vocabulary.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub score_text: ScoreText,
    pub rounding: Rounding,
    pub text_density: f64,
    pub template_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            score_text: ScoreText::Generated,
            rounding: Rounding::TwoDecimals,
            text_density: DEFAULT_TEXT_DENSITY,
            template_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactConfig,
    pub pipeline: PipelineConfig,
    pub server: ServerConfig,
    pub templates: TemplateSet,
}

impl AppConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                AppConfig::default()
            }
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("ENGAGEMENT_MODEL_PATH") {
            if !path.trim().is_empty() {
                self.artifacts.model_path = PathBuf::from(path);
            }
        }
        if let Ok(path) = env::var("ENGAGEMENT_VOCABULARY_PATH") {
            if !path.trim().is_empty() {
                self.artifacts.vocabulary_path = PathBuf::from(path);
            }
        }
        if let Ok(value) = env::var("ENGAGEMENT_SCORE_TEXT") {
            if let Some(score_text) = ScoreText::from_str(&value) {
                self.pipeline.score_text = score_text;
            }
        }
        if let Ok(value) = env::var("ENGAGEMENT_ROUNDING") {
            if let Some(rounding) = Rounding::from_str(&value) {
                self.pipeline.rounding = rounding;
            }
        }
        if let Ok(seed) = env::var("ENGAGEMENT_TEMPLATE_SEED") {
            if let Ok(value) = seed.trim().parse::<u64>() {
                self.pipeline.template_seed = Some(value);
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ENGAGEMENT_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engagement.toml")))
}
