use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CandidateProfile, DimensionScore, JobRequirement};
use crate::scoring::DimensionScorer;

/// Weighted share of required skills the candidate holds.
///
/// score = Σ weight(matched) / Σ weight(required); 0 when the job requires
/// nothing, so the aggregate stays well-formed.
pub fn skills_score(
    candidate: &BTreeSet<String>,
    required: &BTreeMap<String, f64>,
) -> DimensionScore {
    if required.is_empty() {
        return DimensionScore::available(0.0, "job lists no required skills");
    }

    let total: f64 = required.values().sum();
    let (matched, missing): (Vec<(&String, &f64)>, Vec<(&String, &f64)>) =
        required.iter().partition(|(skill, _)| candidate.contains(*skill));
    let matched_weight: f64 = matched.iter().map(|(_, w)| **w).sum();

    let score = if total > 0.0 { matched_weight / total } else { 0.0 };

    let names = |items: &[(&String, &f64)]| {
        if items.is_empty() {
            "none".to_string()
        } else {
            items
                .iter()
                .map(|(s, _)| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    let weighted = required.values().any(|w| (*w - 1.0).abs() > f64::EPSILON);

    let mut rationale = format!(
        "matched {} of {} required skills ({}); missing: {}",
        matched.len(),
        required.len(),
        names(&matched),
        names(&missing)
    );
    if weighted {
        rationale.push_str(&format!(
            " [importance-weighted: {matched_weight:.2} of {total:.2}]"
        ));
    }

    DimensionScore::available(score, rationale)
}

pub struct SkillsScorer;

impl DimensionScorer for SkillsScorer {
    fn score(&self, candidate: &CandidateProfile, job: &JobRequirement) -> DimensionScore {
        skills_score(&candidate.fields.skills, &job.required_skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn required(items: &[(&str, f64)]) -> BTreeMap<String, f64> {
        items.iter().map(|(s, w)| (s.to_string(), *w)).collect()
    }

    #[test]
    fn test_half_of_equal_weight_skills() {
        let score = skills_score(&set(&["python"]), &required(&[("python", 1.0), ("sql", 1.0)]));
        assert_eq!(score.score, Some(0.5));
        assert!(score.rationale.contains("python"));
        assert!(score.rationale.contains("missing: sql"));
    }

    #[test]
    fn test_importance_weighting() {
        let score = skills_score(&set(&["python"]), &required(&[("python", 3.0), ("sql", 1.0)]));
        assert_eq!(score.score, Some(0.75));
        assert!(score.rationale.contains("importance-weighted"));
    }

    #[test]
    fn test_empty_requirement_is_zero_not_undefined() {
        let score = skills_score(&set(&["python"]), &BTreeMap::new());
        assert_eq!(score.score, Some(0.0));
    }

    #[test]
    fn test_no_candidate_skills() {
        let score = skills_score(&BTreeSet::new(), &required(&[("rust", 1.0)]));
        assert_eq!(score.score, Some(0.0));
        assert!(score.rationale.contains("matched 0 of 1"));
    }

    #[test]
    fn test_extra_candidate_skills_do_not_penalize() {
        let score = skills_score(
            &set(&["python", "sql", "docker", "go"]),
            &required(&[("python", 1.0), ("sql", 1.0)]),
        );
        assert_eq!(score.score, Some(1.0));
    }
}
