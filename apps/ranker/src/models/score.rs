use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::profile::{CandidateProfile, Confidence};

/// The five scored dimensions. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Domain,
    Skills,
    Experience,
    Education,
    Semantic,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Domain,
        Dimension::Skills,
        Dimension::Experience,
        Dimension::Education,
        Dimension::Semantic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Domain => "domain",
            Dimension::Skills => "skills",
            Dimension::Experience => "experience",
            Dimension::Education => "education",
            Dimension::Semantic => "semantic",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sub-score in [0, 1] with the reason it came out that way.
///
/// `score == None` means the dimension could not be computed for this
/// candidate (only the semantic dimension does this, when embeddings are
/// unavailable). A missing-data zero is `Some(0.0)`, never `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: Option<f64>,
    pub rationale: String,
}

impl DimensionScore {
    pub fn available(score: f64, rationale: impl Into<String>) -> Self {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            score: Some(score),
            rationale: rationale.into(),
        }
    }

    pub fn unavailable(rationale: impl Into<String>) -> Self {
        Self {
            score: None,
            rationale: rationale.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.score.is_some()
    }
}

/// Per-dimension scores for one candidate. Every dimension is a field, so
/// none can be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub domain: DimensionScore,
    pub skills: DimensionScore,
    pub experience: DimensionScore,
    pub education: DimensionScore,
    pub semantic: DimensionScore,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: Dimension) -> &DimensionScore {
        match dimension {
            Dimension::Domain => &self.domain,
            Dimension::Skills => &self.skills,
            Dimension::Experience => &self.experience,
            Dimension::Education => &self.education,
            Dimension::Semantic => &self.semantic,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &DimensionScore)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// One ranked candidate with its explanation. Built by the ranker only.
#[derive(Debug, Clone)]
pub struct RankedResult {
    /// 1-based position in the final ordering.
    pub rank: usize,
    pub profile: Arc<CandidateProfile>,
    pub breakdown: ScoreBreakdown,
    pub final_score: f64,
    pub notes: Vec<String>,
}

impl RankedResult {
    pub fn candidate_id(&self) -> &str {
        &self.profile.id
    }

    pub fn confidence(&self) -> Confidence {
        self.profile.provenance.confidence
    }

    pub fn export(&self) -> ExportedResult {
        let mut sub_scores = BTreeMap::new();
        let mut rationales = BTreeMap::new();
        for (dimension, score) in self.breakdown.iter() {
            sub_scores.insert(dimension, score.score);
            rationales.insert(dimension, score.rationale.clone());
        }
        ExportedResult {
            candidate_id: self.profile.id.clone(),
            rank: self.rank,
            final_score: self.final_score,
            sub_scores,
            rationales,
            confidence: self.confidence(),
            backend: self.profile.provenance.backend.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// A candidate that could not be scored, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedCandidate {
    pub candidate_id: String,
    pub reason: String,
}

/// Serializable row of the exported ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedResult {
    pub candidate_id: String,
    pub rank: usize,
    pub final_score: f64,
    pub sub_scores: BTreeMap<Dimension, Option<f64>>,
    pub rationales: BTreeMap<Dimension, String>,
    pub confidence: Confidence,
    pub backend: String,
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown() -> ScoreBreakdown {
        ScoreBreakdown {
            domain: DimensionScore::available(1.0, "same domain"),
            skills: DimensionScore::available(0.5, "1/2"),
            experience: DimensionScore::available(1.0, "5y"),
            education: DimensionScore::available(0.0, "none"),
            semantic: DimensionScore::unavailable("no embedding"),
        }
    }

    #[test]
    fn test_available_clamps_into_unit_interval() {
        assert_eq!(DimensionScore::available(1.7, "").score, Some(1.0));
        assert_eq!(DimensionScore::available(-0.2, "").score, Some(0.0));
        assert_eq!(DimensionScore::available(f64::NAN, "").score, Some(0.0));
    }

    #[test]
    fn test_iter_visits_every_dimension_in_order() {
        let b = breakdown();
        let dims: Vec<Dimension> = b.iter().map(|(d, _)| d).collect();
        assert_eq!(dims, Dimension::ALL.to_vec());
    }

    #[test]
    fn test_zero_score_is_present_not_absent() {
        let b = breakdown();
        assert_eq!(b.get(Dimension::Education).score, Some(0.0));
        assert!(!b.get(Dimension::Semantic).is_available());
    }

    #[test]
    fn test_breakdown_serializes_every_key() {
        let value = serde_json::to_value(breakdown()).unwrap();
        for d in Dimension::ALL {
            assert!(value.get(d.as_str()).is_some(), "missing key {d}");
        }
        assert!(value["semantic"]["score"].is_null());
    }
}
