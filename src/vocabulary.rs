use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ArtifactError, Result};

/// Code reserved for companies outside the training-time vocabulary.
pub const UNKNOWN_COMPANY_CODE: u32 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyEntry {
    pub name: String,
    pub code: u32,
    pub average_likes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularySnapshot {
    #[serde(default)]
    pub fallback_average_likes: f64,
    pub companies: Vec<CompanyEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMiss {
    EmptyName,
    UnknownCompany,
}

impl LookupMiss {
    pub fn reason(self) -> &'static str {
        match self {
            LookupMiss::EmptyName => "empty company name",
            LookupMiss::UnknownCompany => "company not in training vocabulary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompanyLookup {
    pub code: u32,
    pub average_likes: f64,
    pub miss: Option<LookupMiss>,
}

impl CompanyLookup {
    pub fn is_known(&self) -> bool {
        self.miss.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct CompanyStats {
    code: u32,
    average_likes: f64,
}

/// Immutable company table captured at training time.
#[derive(Debug, Clone)]
pub struct CompanyVocabulary {
    entries: HashMap<String, CompanyStats>,
    fallback_average_likes: f64,
}

impl CompanyVocabulary {
    pub fn from_snapshot(snapshot: VocabularySnapshot) -> Result<Self> {
        if !snapshot.fallback_average_likes.is_finite() {
            return Err(ArtifactError::Vocabulary(
                "fallback_average_likes must be finite".to_string(),
            ));
        }

        let mut entries = HashMap::with_capacity(snapshot.companies.len());
        for entry in snapshot.companies {
            let key = normalize_company(&entry.name);
            if key.is_empty() {
                return Err(ArtifactError::Vocabulary("empty company name".to_string()));
            }
            if entry.code == UNKNOWN_COMPANY_CODE {
                return Err(ArtifactError::Vocabulary(format!(
                    "company {} uses reserved code {}",
                    entry.name, UNKNOWN_COMPANY_CODE
                )));
            }
            if !entry.average_likes.is_finite() {
                return Err(ArtifactError::Vocabulary(format!(
                    "company {} has a non-finite average",
                    entry.name
                )));
            }
            let stats = CompanyStats {
                code: entry.code,
                average_likes: entry.average_likes,
            };
            if entries.insert(key.clone(), stats).is_some() {
                return Err(ArtifactError::Vocabulary(format!(
                    "duplicate company after normalization: {}",
                    key
                )));
            }
        }

        Ok(Self {
            entries,
            fallback_average_likes: snapshot.fallback_average_likes,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        let data = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: shown.clone(),
            source,
        })?;
        let snapshot: VocabularySnapshot =
            serde_json::from_str(&data).map_err(|source| ArtifactError::Parse {
                path: shown.clone(),
                source,
            })?;
        let vocabulary = Self::from_snapshot(snapshot)?;
        tracing::info!(path = %shown, companies = vocabulary.len(), "loaded company vocabulary");
        Ok(vocabulary)
    }

    pub fn lookup(&self, name: &str) -> CompanyLookup {
        let key = normalize_company(name);
        if key.is_empty() {
            return self.miss(LookupMiss::EmptyName);
        }
        match self.entries.get(&key) {
            Some(stats) => CompanyLookup {
                code: stats.code,
                average_likes: stats.average_likes,
                miss: None,
            },
            None => self.miss(LookupMiss::UnknownCompany),
        }
    }

    pub fn encode_company(&self, name: &str) -> u32 {
        self.lookup(name).code
    }

    pub fn average_likes(&self, name: &str) -> f64 {
        self.lookup(name).average_likes
    }

    pub fn fallback_average_likes(&self) -> f64 {
        self.fallback_average_likes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn miss(&self, reason: LookupMiss) -> CompanyLookup {
        CompanyLookup {
            code: UNKNOWN_COMPANY_CODE,
            average_likes: self.fallback_average_likes,
            miss: Some(reason),
        }
    }
}

pub fn normalize_company(name: &str) -> String {
    name.trim().to_lowercase()
}
