use crate::models::{CandidateProfile, DimensionScore, JobRequirement};
use crate::scoring::DimensionScorer;

/// Cosine similarity of two embeddings, rescaled from [-1, 1] to [0, 1].
///
/// Unavailable (not zero) when either vector is missing, empty, all zeros,
/// or the dimensions disagree.
pub fn semantic_score(candidate: Option<&[f32]>, job: Option<&[f32]>) -> DimensionScore {
    let (Some(a), Some(b)) = (candidate, job) else {
        let side = match (candidate.is_none(), job.is_none()) {
            (true, true) => "candidate and job",
            (true, false) => "candidate",
            _ => "job",
        };
        return DimensionScore::unavailable(format!(
            "no embedding for {side}; weight redistributed"
        ));
    };

    match cosine(a, b) {
        Some(cos) => {
            let score = (cos + 1.0) / 2.0;
            DimensionScore::available(score, format!("embedding cosine similarity {cos:.3}"))
        }
        None => DimensionScore::unavailable(format!(
            "embeddings not comparable (dims {} vs {}); weight redistributed",
            a.len(),
            b.len()
        )),
    }
}

fn cosine(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return None;
    }
    let cos = dot / (na.sqrt() * nb.sqrt());
    cos.is_finite().then(|| cos.clamp(-1.0, 1.0))
}

pub struct SemanticScorer;

impl DimensionScorer for SemanticScorer {
    fn score(&self, candidate: &CandidateProfile, job: &JobRequirement) -> DimensionScore {
        semantic_score(candidate.embedding.as_deref(), job.embedding.as_deref())
    }
}
