use crate::models::{CandidateProfile, DimensionScore, JobRequirement};
use crate::scoring::DimensionScorer;

/// min(1, candidate / required); 1 when nothing is required.
pub fn experience_score(candidate_years: f64, required_years: f64) -> DimensionScore {
    if required_years <= 0.0 {
        return DimensionScore::available(
            1.0,
            format!("no minimum experience required; candidate has {candidate_years:.1} years"),
        );
    }

    let score = (candidate_years.max(0.0) / required_years).min(1.0);
    let verdict = if score >= 1.0 { "meets" } else { "below" };
    DimensionScore::available(
        score,
        format!(
            "{candidate_years:.1} years of experience {verdict} the \
             {required_years:.1} years required"
        ),
    )
}

pub struct ExperienceScorer;

impl DimensionScorer for ExperienceScorer {
    fn score(&self, candidate: &CandidateProfile, job: &JobRequirement) -> DimensionScore {
        experience_score(candidate.fields.experience_years, job.minimum_experience_years)
    }
}
