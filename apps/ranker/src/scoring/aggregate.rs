use serde::Serialize;

use crate::config::Weights;
use crate::domain::DomainCompatibility;
use crate::models::{Dimension, ScoreBreakdown};

/// Final score plus the bookkeeping needed to explain it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateScore {
    pub final_score: f64,
    /// Σ weight over the dimensions that contributed.
    pub weight_used: f64,
    /// Dimensions whose weight was redistributed because they were unavailable.
    pub redistributed: Vec<Dimension>,
    /// True when the strict gate forced the score to 0.
    pub gated: bool,
}

/// Weighted mean over available dimensions.
///
/// final = Σ wᵢ·sᵢ / Σ wᵢ for i in available dimensions. Unavailable
/// dimensions leave both numerator and denominator, so the remaining
/// weights are renormalized rather than scored as zero.
#[derive(Debug, Clone)]
pub struct WeightedAggregator {
    weights: Weights,
    strict_gate: bool,
}

impl WeightedAggregator {
    pub fn new(weights: Weights, strict_gate: bool) -> Self {
        Self {
            weights,
            strict_gate,
        }
    }

    pub fn aggregate(
        &self,
        breakdown: &ScoreBreakdown,
        compatibility: DomainCompatibility,
    ) -> AggregateScore {
        let mut numerator = 0.0;
        let mut weight_used = 0.0;
        let mut redistributed = Vec::new();

        for (dimension, score) in breakdown.iter() {
            let weight = self.weights.get(dimension);
            match score.score {
                Some(s) => {
                    numerator += weight * s;
                    weight_used += weight;
                }
                None => redistributed.push(dimension),
            }
        }

        let weighted = if weight_used > 0.0 {
            (numerator / weight_used).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let gated = self.strict_gate && compatibility == DomainCompatibility::Mismatch;

        AggregateScore {
            final_score: if gated { 0.0 } else { weighted },
            weight_used,
            redistributed,
            gated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionScore;

    fn breakdown(semantic: Option<f64>) -> ScoreBreakdown {
        ScoreBreakdown {
            domain: DimensionScore::available(1.0, ""),
            skills: DimensionScore::available(0.5, ""),
            experience: DimensionScore::available(1.0, ""),
            education: DimensionScore::available(1.0, ""),
            semantic: match semantic {
                Some(s) => DimensionScore::available(s, ""),
                None => DimensionScore::unavailable(""),
            },
        }
    }

    #[test]
    fn test_weighted_mean_of_all_dimensions() {
        let agg = WeightedAggregator::new(Weights::default(), false);
        let result = agg.aggregate(&breakdown(Some(0.0)), DomainCompatibility::Match);
        // 0.25 + 0.175 + 0.15 + 0.05 + 0 over 1.0
        assert!((result.final_score - 0.625).abs() < 1e-9);
        assert!((result.weight_used - 1.0).abs() < 1e-9);
        assert!(result.redistributed.is_empty());
    }

    #[test]
    fn test_unavailable_dimension_is_renormalized_not_zeroed() {
        let agg = WeightedAggregator::new(Weights::default(), false);
        let result = agg.aggregate(&breakdown(None), DomainCompatibility::Match);
        // 0.625 over 0.80
        assert!((result.final_score - 0.78125).abs() < 1e-9);
        assert!((result.weight_used - 0.80).abs() < 1e-9);
        assert_eq!(result.redistributed, vec![Dimension::Semantic]);
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        let doubled = Weights {
            domain: 0.5,
            skills: 0.7,
            experience: 0.3,
            education: 0.1,
            semantic: 0.4,
        };
        let a = WeightedAggregator::new(Weights::default(), false)
            .aggregate(&breakdown(Some(0.3)), DomainCompatibility::Match);
        let b = WeightedAggregator::new(doubled, false)
            .aggregate(&breakdown(Some(0.3)), DomainCompatibility::Match);
        assert!((a.final_score - b.final_score).abs() < 1e-9);
    }

    #[test]
    fn test_strict_gate_zeroes_mismatch_but_keeps_breakdown() {
        let agg = WeightedAggregator::new(Weights::default(), true);
        let b = breakdown(Some(0.9));
        let result = agg.aggregate(&b, DomainCompatibility::Mismatch);
        assert_eq!(result.final_score, 0.0);
        assert!(result.gated);
        assert_eq!(b.skills.score, Some(0.5));
    }

    #[test]
    fn test_gate_ignores_indeterminate() {
        let agg = WeightedAggregator::new(Weights::default(), true);
        let result = agg.aggregate(&breakdown(Some(0.9)), DomainCompatibility::Indeterminate);
        assert!(!result.gated);
        assert!(result.final_score > 0.0);
    }

    #[test]
    fn test_mismatch_without_gate_is_soft() {
        let agg = WeightedAggregator::new(Weights::default(), false);
        let result = agg.aggregate(&breakdown(Some(0.9)), DomainCompatibility::Mismatch);
        assert!(!result.gated);
        assert!(result.final_score > 0.0);
    }

    #[test]
    fn test_final_score_within_unit_interval() {
        let agg = WeightedAggregator::new(Weights::default(), false);
        for s in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let r = agg.aggregate(&breakdown(Some(s)), DomainCompatibility::Match);
            assert!((0.0..=1.0).contains(&r.final_score));
        }
    }
}
