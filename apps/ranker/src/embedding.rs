//! Embedding collaborator. The pipeline only needs "a vector or nothing";
//! every failure mode collapses to the unavailable state in the caller.

use std::hash::{Hash, Hasher};
use std::time::Duration;

use async_trait::async_trait;
use siphasher::sip::SipHasher13;
use tracing::{debug, warn};

use crate::errors::EmbeddingError;

// Fixed keys keep vectors stable across runs and toolchains. Changing them
// changes every embedding.
const HASH_KEY_0: u64 = 0x5eed_0f7e_c0de_0001;
const HASH_KEY_1: u64 = 0x5eed_0f7e_c0de_0002;

pub const DEFAULT_DIMENSION: usize = 512;

#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Runs one embedding call under `timeout`. `None` means unavailable.
pub async fn embed_or_none(
    embedder: &dyn Embedder,
    text: &str,
    timeout: Duration,
) -> Option<Vec<f32>> {
    let result = match tokio::time::timeout(timeout, embedder.embed(text)).await {
        Ok(inner) => inner,
        Err(_) => Err(EmbeddingError::Timeout(timeout)),
    };
    match result {
        Ok(vector) if !vector.is_empty() => Some(vector),
        Ok(_) => {
            debug!(embedder = embedder.name(), "Embedder returned an empty vector");
            None
        }
        Err(e) => {
            warn!(embedder = embedder.name(), error = %e, "Embedding unavailable");
            None
        }
    }
}

/// Deterministic feature-hashing bag of words. Works offline, needs no model.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        token.hash(&mut hasher);
        hasher.finish()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokens(text) {
            let h = Self::hash(&token);
            let idx = (h % self.dimension as u64) as usize;
            // High bit picks the sign so collisions partly cancel.
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let vector = self.vectorize(text);
        if vector.iter().all(|v| *v == 0.0) {
            return Err(EmbeddingError::Unavailable(
                "text has no indexable tokens".to_string(),
            ));
        }
        Ok(vector)
    }
}

/// Always unavailable. Used when semantic scoring is switched off.
#[derive(Debug, Clone, Default)]
pub struct DisabledEmbedder;

#[async_trait]
impl Embedder for DisabledEmbedder {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Unavailable("embeddings disabled".to_string()))
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::semantic::semantic_score;

    struct SlowEmbedder;

    #[async_trait]
    impl Embedder for SlowEmbedder {
        fn name(&self) -> &str {
            "slow"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![1.0])
        }
    }

    #[tokio::test]
    async fn test_hashing_is_deterministic_and_normalized() {
        let e = HashingEmbedder::default();
        let a = e.embed("Python engineer with SQL").await.unwrap();
        let b = e.embed("Python engineer with SQL").await.unwrap();
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_similar_text_scores_higher() {
        let e = HashingEmbedder::default();
        let job = e.embed("python sql data pipelines airflow").await.unwrap();
        let close = e.embed("built data pipelines in python and sql").await.unwrap();
        let far = e.embed("audited ledgers under ifrs as a chartered accountant").await.unwrap();
        let close_score = semantic_score(Some(close.as_slice()), Some(job.as_slice()))
            .score
            .unwrap();
        let far_score = semantic_score(Some(far.as_slice()), Some(job.as_slice())).score.unwrap();
        assert!(close_score > far_score);
    }

    #[tokio::test]
    async fn test_empty_text_is_unavailable() {
        let e = HashingEmbedder::default();
        assert!(embed_or_none(&e, "  - ", Duration::from_secs(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_disabled_is_unavailable() {
        assert!(embed_or_none(&DisabledEmbedder, "python", Duration::from_secs(1))
            .await
            .is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unavailable() {
        assert!(embed_or_none(&SlowEmbedder, "python", Duration::from_secs(10))
            .await
            .is_none());
    }
}
