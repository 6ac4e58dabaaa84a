//! Resume ranking engine: extraction with LLM-to-regex fallback, feature
//! normalization, domain gating, per-dimension scoring, weighted
//! aggregation and deterministic ranking.

pub mod config;
pub mod document;
pub mod domain;
pub mod embedding;
pub mod errors;
pub mod extraction;
pub mod llm_client;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod scoring;

pub use config::{Config, MatchingConfig, Weights};
pub use errors::MatchError;
pub use pipeline::{CandidateDocument, MatchingEngine, RunReport};
