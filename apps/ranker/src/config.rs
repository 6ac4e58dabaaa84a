use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::MatchError;
use crate::models::Dimension;

/// Default LLM backend priority: primary, secondary, tertiary.
pub const DEFAULT_LLM_MODELS: &[&str] = &[
    "claude-sonnet-4-5",
    "claude-3-5-haiku-latest",
    "claude-3-haiku-20240307",
];

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// When absent no LLM backends are built and extraction is regex-only.
    pub anthropic_api_key: Option<String>,
    pub llm_models: Vec<String>,
    pub llm_call_timeout: Duration,
    pub embedding_timeout: Duration,
    pub max_concurrent_llm_calls: usize,
    pub matching_config_path: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_models = match optional_env("LLM_MODELS") {
            Some(raw) => parse_model_list(&raw),
            None => DEFAULT_LLM_MODELS.iter().map(|m| m.to_string()).collect(),
        };

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_models,
            llm_call_timeout: Duration::from_secs(parse_env("LLM_CALL_TIMEOUT_SECS", 30)?),
            embedding_timeout: Duration::from_secs(parse_env("EMBEDDING_TIMEOUT_SECS", 10)?),
            max_concurrent_llm_calls: parse_env::<usize>("MAX_CONCURRENT_LLM_CALLS", 4)?.max(1),
            matching_config_path: optional_env("MATCHING_CONFIG").map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Loads the matching tables from `MATCHING_CONFIG`, or the defaults.
    pub fn load_matching_config(&self) -> Result<MatchingConfig> {
        let config = match &self.matching_config_path {
            Some(path) => MatchingConfig::from_file(path)?,
            None => MatchingConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Matching tables
// ────────────────────────────────────────────────────────────────────────────

/// Relative dimension weights. Need not sum to 1; the aggregator divides by
/// the sum of the weights it actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub domain: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub semantic: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            domain: 0.25,
            skills: 0.35,
            experience: 0.15,
            education: 0.05,
            semantic: 0.20,
        }
    }
}

impl Weights {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Domain => self.domain,
            Dimension::Skills => self.skills,
            Dimension::Experience => self.experience,
            Dimension::Education => self.education,
            Dimension::Semantic => self.semantic,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

/// One row of the domain-keyword table. Table order is the tie-break order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainKeywords {
    pub label: String,
    pub keywords: Vec<String>,
}

impl DomainKeywords {
    fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Read-only tables and switches for one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub weights: Weights,
    pub domains: Vec<DomainKeywords>,
    pub unknown_domain: String,
    /// Minimum keyword hits before a domain is assigned.
    pub min_domain_overlap: usize,
    /// Domain sub-score when either side is the unknown domain.
    pub unknown_domain_score: f64,
    /// Alias → canonical skill name.
    pub skill_synonyms: BTreeMap<String, String>,
    /// When set, a domain mismatch forces the final score to 0.
    pub strict_gate: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            domains: default_domains(),
            unknown_domain: "Unknown".to_string(),
            min_domain_overlap: 1,
            unknown_domain_score: 0.5,
            skill_synonyms: default_synonyms(),
            strict_gate: false,
        }
    }
}

impl MatchingConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read matching config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse matching config {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        for dimension in Dimension::ALL {
            let w = self.weights.get(dimension);
            if !w.is_finite() || w < 0.0 {
                return Err(MatchError::Config(format!(
                    "weight for {dimension} must be a non-negative number, got {w}"
                )));
            }
        }
        if self.weights.sum() <= 0.0 {
            return Err(MatchError::Config(
                "at least one dimension weight must be positive".to_string(),
            ));
        }
        if self.domains.is_empty() {
            return Err(MatchError::Config("domain table is empty".to_string()));
        }
        if self
            .domains
            .iter()
            .any(|d| d.label.eq_ignore_ascii_case(&self.unknown_domain))
        {
            return Err(MatchError::Config(format!(
                "domain table must not declare the unknown label '{}'",
                self.unknown_domain
            )));
        }
        if !(0.0..=1.0).contains(&self.unknown_domain_score) {
            return Err(MatchError::Config(
                "unknown_domain_score must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_domains() -> Vec<DomainKeywords> {
    vec![
        DomainKeywords::new(
            "AI/ML",
            &[
                "machine learning",
                "deep learning",
                "computer vision",
                "nlp",
                "neural network",
                "tensorflow",
                "pytorch",
                "scikit-learn",
                "data science",
                "reinforcement learning",
                "llm",
            ],
        ),
        DomainKeywords::new(
            "Accounting",
            &[
                "accounting",
                "audit",
                "ifrs",
                "gaap",
                "taxation",
                "financial reporting",
                "bookkeeping",
                "quickbooks",
                "cpa",
                "acca",
                "chartered accountant",
                "accountant",
                "auditor",
            ],
        ),
        DomainKeywords::new(
            "Engineering",
            &[
                "software",
                "developer",
                "backend",
                "frontend",
                "devops",
                "kubernetes",
                "docker",
                "microservices",
                "electrical",
                "mechanical",
                "cad",
                "engineer",
            ],
        ),
    ]
}

fn default_synonyms() -> BTreeMap<String, String> {
    [
        ("js", "javascript"),
        ("ecmascript", "javascript"),
        ("ts", "typescript"),
        ("node.js", "nodejs"),
        ("node", "nodejs"),
        ("react.js", "react"),
        ("reactjs", "react"),
        ("golang", "go"),
        ("k8s", "kubernetes"),
        ("postgres", "postgresql"),
        ("ml", "machine learning"),
        ("dl", "deep learning"),
        ("sklearn", "scikit-learn"),
        ("scikit learn", "scikit-learn"),
        ("tf", "tensorflow"),
        ("py", "python"),
        ("python3", "python"),
        ("c sharp", "c#"),
        ("ms excel", "excel"),
        ("microsoft excel", "excel"),
        ("amazon web services", "aws"),
        ("google cloud", "gcp"),
    ]
    .into_iter()
    .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matching_config_is_valid() {
        assert!(MatchingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = MatchingConfig::default();
        config.weights.skills = -0.1;
        assert!(matches!(config.validate(), Err(MatchError::Config(_))));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut config = MatchingConfig::default();
        config.weights = Weights {
            domain: 0.0,
            skills: 0.0,
            experience: 0.0,
            education: 0.0,
            semantic: 0.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_label_in_table_rejected() {
        let mut config = MatchingConfig::default();
        config
            .domains
            .push(DomainKeywords::new("unknown", &["anything"]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_weights_sum() {
        let w = Weights::default();
        assert!((w.sum() - 1.0).abs() < 1e-9);
        assert_eq!(w.get(Dimension::Skills), w.skills);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: MatchingConfig =
            serde_json::from_str(r#"{"strict_gate": true, "unknown_domain": "General"}"#).unwrap();
        assert!(config.strict_gate);
        assert_eq!(config.unknown_domain, "General");
        assert_eq!(config.weights, Weights::default());
        assert!(!config.domains.is_empty());
    }

    #[test]
    fn test_matching_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matching.json");
        std::fs::write(&path, r#"{"min_domain_overlap": 2}"#).unwrap();
        let config = MatchingConfig::from_file(&path).unwrap();
        assert_eq!(config.min_domain_overlap, 2);
    }

    #[test]
    fn test_parse_model_list_skips_blanks() {
        assert_eq!(
            parse_model_list(" a , ,b,"),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
