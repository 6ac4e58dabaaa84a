//! Dimension scorers and the weighted aggregator.
//!
//! Each scorer is a pure function of (candidate, job) returning a sub-score
//! in [0, 1] with a rationale. The domain sub-score comes from the
//! `DomainClassifier`, since it also drives the strict gate.

pub mod aggregate;
pub mod education;
pub mod experience;
pub mod semantic;
pub mod skills;

pub use aggregate::{AggregateScore, WeightedAggregator};

use crate::models::{CandidateProfile, DimensionScore, JobRequirement, ScoreBreakdown};

/// One scoring dimension. Implement this to add or swap a scorer without
/// touching the pipeline.
pub trait DimensionScorer: Send + Sync {
    fn score(&self, candidate: &CandidateProfile, job: &JobRequirement) -> DimensionScore;
}

/// The skills, experience, education, and semantic scorers in one place.
pub struct ScorerSet {
    skills: skills::SkillsScorer,
    experience: experience::ExperienceScorer,
    education: education::EducationScorer,
    semantic: semantic::SemanticScorer,
}

impl Default for ScorerSet {
    fn default() -> Self {
        Self {
            skills: skills::SkillsScorer,
            experience: experience::ExperienceScorer,
            education: education::EducationScorer,
            semantic: semantic::SemanticScorer,
        }
    }
}

impl ScorerSet {
    /// Builds the full breakdown given the already-computed domain sub-score.
    pub fn breakdown(
        &self,
        candidate: &CandidateProfile,
        job: &JobRequirement,
        domain: DimensionScore,
    ) -> ScoreBreakdown {
        ScoreBreakdown {
            domain,
            skills: self.skills.score(candidate, job),
            experience: self.experience.score(candidate, job),
            education: self.education.score(candidate, job),
            semantic: self.semantic.score(candidate, job),
        }
    }
}
