use crate::models::{CandidateProfile, DimensionScore, EducationLevel, JobRequirement};
use crate::scoring::DimensionScorer;

/// Score lost per ordinal level below the requirement.
const PENALTY_PER_LEVEL: f64 = 0.5;

/// 1 when the candidate meets or exceeds the requirement, otherwise
/// 1 - 0.5 × levels short, floored at 0.
pub fn education_score(
    candidate: EducationLevel,
    candidate_recognized: bool,
    required: Option<EducationLevel>,
) -> DimensionScore {
    let held = if candidate_recognized {
        candidate.to_string()
    } else {
        format!("{candidate} (unrecognized, assumed)")
    };

    let Some(required) = required else {
        return DimensionScore::available(
            1.0,
            format!("no education requirement; candidate holds {held}"),
        );
    };

    if candidate >= required {
        return DimensionScore::available(1.0, format!("{held} meets required {required}"));
    }

    let gap = (required.ordinal() - candidate.ordinal()) as f64;
    let score = (1.0 - PENALTY_PER_LEVEL * gap).max(0.0);
    DimensionScore::available(
        score,
        format!("{held} is {gap} level(s) below required {required}"),
    )
}

pub struct EducationScorer;

impl DimensionScorer for EducationScorer {
    fn score(&self, candidate: &CandidateProfile, job: &JobRequirement) -> DimensionScore {
        education_score(
            candidate.fields.education_level,
            candidate.fields.education_recognized,
            job.required_education_level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_level_is_exactly_one() {
        for level in [
            EducationLevel::HighSchool,
            EducationLevel::Bachelor,
            EducationLevel::Master,
            EducationLevel::Doctorate,
        ] {
            assert_eq!(education_score(level, true, Some(level)).score, Some(1.0));
        }
    }

    #[test]
    fn test_higher_level_is_one() {
        let score = education_score(EducationLevel::Master, true, Some(EducationLevel::Bachelor));
        assert_eq!(score.score, Some(1.0));
    }

    #[test]
    fn test_one_level_below_is_half() {
        let score = education_score(EducationLevel::Bachelor, true, Some(EducationLevel::Master));
        assert_eq!(score.score, Some(0.5));
    }

    #[test]
    fn test_far_below_floors_at_zero() {
        let score = education_score(
            EducationLevel::HighSchool,
            true,
            Some(EducationLevel::Doctorate),
        );
        assert_eq!(score.score, Some(0.0));
    }

    #[test]
    fn test_no_requirement_is_one() {
        assert_eq!(
            education_score(EducationLevel::HighSchool, false, None).score,
            Some(1.0)
        );
    }

    #[test]
    fn test_unrecognized_is_called_out() {
        let score = education_score(
            EducationLevel::HighSchool,
            false,
            Some(EducationLevel::Bachelor),
        );
        assert!(score.rationale.contains("unrecognized"));
        assert_eq!(score.score, Some(0.5));
    }
}
