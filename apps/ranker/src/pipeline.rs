//! Matching engine: One run scores every candidate against one job.
//!
//! Candidates fan out concurrently and join before ranking. A candidate that
//! cannot be decoded or extracted is excluded with a reason; only job-side
//! failures abort the run.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::{Config, MatchingConfig};
use crate::document::{DocumentDecoder, DocumentSource, FileDecoder};
use crate::domain::{DomainAssignment, DomainClassifier, DomainCompatibility};
use crate::embedding::{embed_or_none, Embedder, HashingEmbedder};
use crate::errors::MatchError;
use crate::extraction::llm::LlmExtractor;
use crate::extraction::regex::RegexExtractor;
use crate::extraction::{BackendAttempt, ExtractionBackend, ExtractionOrchestrator};
use crate::llm_client::LlmClient;
use crate::models::{
    CandidateProfile, Dimension, DocumentRole, ExcludedCandidate, ExportedResult,
    ExtractionResult, JobRequirement, RankedResult,
};
use crate::normalize::FeatureNormalizer;
use crate::ranking::{rank, ScoredCandidate};
use crate::scoring::{ScorerSet, WeightedAggregator};

/// One resume to score. `id` is the tie-break key, so keep it stable.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub id: String,
    pub source: DocumentSource,
}

/// Which backend handled a document and what was tried on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionDiagnostic {
    pub document: String,
    pub backend: Option<String>,
    pub attempts: Vec<BackendAttempt>,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub job: Arc<JobRequirement>,
    pub job_notes: Vec<String>,
    pub ranked: Vec<RankedResult>,
    pub excluded: Vec<ExcludedCandidate>,
    pub diagnostics: Vec<ExtractionDiagnostic>,
}

#[derive(Serialize)]
struct ReportExport<'a> {
    run_id: Uuid,
    job_domain: &'a str,
    job_notes: &'a [String],
    results: Vec<ExportedResult>,
    excluded: &'a [ExcludedCandidate],
    diagnostics: &'a [ExtractionDiagnostic],
}

impl RunReport {
    pub fn job_domain(&self) -> &str {
        &self.job.domain
    }

    /// Ranked results as serializable rows, best first.
    pub fn export(&self) -> Vec<ExportedResult> {
        self.ranked.iter().map(RankedResult::export).collect()
    }

    pub fn to_json(&self) -> Result<String, MatchError> {
        let export = ReportExport {
            run_id: self.run_id,
            job_domain: &self.job.domain,
            job_notes: &self.job_notes,
            results: self.export(),
            excluded: &self.excluded,
            diagnostics: &self.diagnostics,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

enum CandidateOutcome {
    Scored(ScoredCandidate),
    Excluded(ExcludedCandidate),
}

pub struct MatchingEngine {
    config: MatchingConfig,
    decoder: Arc<dyn DocumentDecoder>,
    orchestrator: ExtractionOrchestrator,
    embedder: Arc<dyn Embedder>,
    embedding_timeout: Duration,
    classifier: DomainClassifier,
    scorers: ScorerSet,
    aggregator: WeightedAggregator,
    as_of: Option<NaiveDate>,
}

impl MatchingEngine {
    /// Fails only on an invalid matching configuration.
    pub fn new(
        config: MatchingConfig,
        decoder: Arc<dyn DocumentDecoder>,
        orchestrator: ExtractionOrchestrator,
        embedder: Arc<dyn Embedder>,
        embedding_timeout: Duration,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            classifier: DomainClassifier::new(&config),
            aggregator: WeightedAggregator::new(config.weights, config.strict_gate),
            scorers: ScorerSet::default(),
            config,
            decoder,
            orchestrator,
            embedder,
            embedding_timeout,
            as_of: None,
        })
    }

    /// Default wiring: one LLM backend per configured model when an API key
    /// is present, regex last, file decoder, hashing embedder.
    pub fn from_config(config: &Config, matching: MatchingConfig) -> Result<Self, MatchError> {
        let mut backends: Vec<Arc<dyn ExtractionBackend>> = Vec::new();

        match &config.anthropic_api_key {
            Some(key) => {
                let client = LlmClient::new(key.clone(), config.llm_call_timeout)
                    .map_err(|e| MatchError::Config(format!("failed to build LLM client: {e}")))?;
                for model in &config.llm_models {
                    backends.push(Arc::new(LlmExtractor::new(client.clone(), model.clone())));
                }
            }
            None => warn!("ANTHROPIC_API_KEY not set, extraction will use regex only"),
        }
        backends.push(Arc::new(RegexExtractor::new()));

        let orchestrator = ExtractionOrchestrator::new(
            backends,
            config.max_concurrent_llm_calls,
            config.llm_call_timeout,
        );
        info!(backends = ?orchestrator.backend_names(), "Extraction chain configured");

        Self::new(
            matching,
            Arc::new(FileDecoder),
            orchestrator,
            Arc::new(HashingEmbedder::default()),
            config.embedding_timeout,
        )
    }

    /// Pins the date that open-ended employment ("Present") resolves to.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub async fn run(
        &self,
        job: DocumentSource,
        candidates: Vec<CandidateDocument>,
    ) -> Result<RunReport, MatchError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("matching_run", %run_id, candidates = candidates.len());
        self.run_inner(run_id, job, candidates).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        job_source: DocumentSource,
        candidates: Vec<CandidateDocument>,
    ) -> Result<RunReport, MatchError> {
        let normalizer = FeatureNormalizer::new(
            &self.config.skill_synonyms,
            self.as_of.unwrap_or_else(|| Utc::now().date_naive()),
        );
        let mut diagnostics = Vec::with_capacity(candidates.len() + 1);

        let (job, job_domain, job_notes) = self
            .build_job(&job_source, &normalizer, &mut diagnostics)
            .await?;
        let job = Arc::new(job);
        info!(
            domain = %job.domain,
            required_skills = job.required_skills.len(),
            "Job requirements ready"
        );

        let outcomes = futures::future::join_all(candidates.iter().map(|candidate| {
            self.score_candidate(candidate, &job, &job_domain, &normalizer)
                .instrument(info_span!("candidate", id = %candidate.id))
        }))
        .await;

        let mut scored = Vec::new();
        let mut excluded = Vec::new();
        for (outcome, diagnostic) in outcomes {
            diagnostics.extend(diagnostic);
            match outcome {
                CandidateOutcome::Scored(c) => scored.push(c),
                CandidateOutcome::Excluded(e) => excluded.push(e),
            }
        }

        let ranked = rank(scored);
        info!(
            ranked = ranked.len(),
            excluded = excluded.len(),
            "Matching run complete"
        );

        Ok(RunReport {
            run_id,
            job,
            job_notes,
            ranked,
            excluded,
            diagnostics,
        })
    }

    async fn build_job(
        &self,
        source: &DocumentSource,
        normalizer: &FeatureNormalizer,
        diagnostics: &mut Vec<ExtractionDiagnostic>,
    ) -> Result<(JobRequirement, DomainAssignment, Vec<String>), MatchError> {
        let text = self.decoder.decode(source).await?;

        let extraction = self
            .orchestrator
            .extract(&text, DocumentRole::JobDescription)
            .await;
        diagnostics.push(ExtractionDiagnostic {
            document: "job".to_string(),
            backend: extraction.backend.clone(),
            attempts: extraction.attempts.clone(),
        });
        let provenance = extraction.provenance();
        let fields = match extraction.result.fields() {
            Some(fields) => fields,
            None => {
                let reason = match &extraction.result {
                    ExtractionResult::Failed(reason) => reason.clone(),
                    _ => "no fields".to_string(),
                };
                return Err(MatchError::JobExtraction(reason));
            }
        };

        let normalized = normalizer.job(fields);
        let mut notes = normalized.notes;
        if extraction.fallback {
            notes.push(format!(
                "job extracted by {} fallback; low confidence",
                provenance.backend
            ));
        }
        if let Some(reason) = &provenance.degraded_reason {
            notes.push(format!("job extraction degraded: {reason}"));
        }
        if normalized.value.required_skills.is_empty() {
            notes.push(
                "job lists no required skills; skills sub-score is 0 for everyone".to_string(),
            );
        }

        let job = normalized.value;
        let domain = self.classifier.classify_profile(
            &job.required_skills.keys().cloned().collect(),
            &job.titles,
        );
        let embedding = embed_or_none(self.embedder.as_ref(), &text, self.embedding_timeout).await;
        if embedding.is_none() {
            notes.push(
                "job embedding unavailable; semantic dimension skipped for all candidates"
                    .to_string(),
            );
        }

        Ok((
            JobRequirement {
                raw_text: text,
                required_skills: job.required_skills,
                minimum_experience_years: job.minimum_experience_years,
                required_education_level: job.required_education_level,
                certifications: job.certifications,
                titles: job.titles,
                domain: domain.label.clone(),
                embedding,
                provenance,
            },
            domain,
            notes,
        ))
    }

    async fn score_candidate(
        &self,
        candidate: &CandidateDocument,
        job: &JobRequirement,
        job_domain: &DomainAssignment,
        normalizer: &FeatureNormalizer,
    ) -> (CandidateOutcome, Option<ExtractionDiagnostic>) {
        let exclude = |reason: String| {
            warn!(candidate = %candidate.id, %reason, "Candidate excluded");
            CandidateOutcome::Excluded(ExcludedCandidate {
                candidate_id: candidate.id.clone(),
                reason,
            })
        };

        let text = match self.decoder.decode(&candidate.source).await {
            Ok(text) => text,
            Err(e) => return (exclude(format!("document could not be decoded: {e}")), None),
        };

        let extraction = self.orchestrator.extract(&text, DocumentRole::Resume).await;
        let diagnostic = ExtractionDiagnostic {
            document: candidate.id.clone(),
            backend: extraction.backend.clone(),
            attempts: extraction.attempts.clone(),
        };
        let Some(fields) = extraction.result.fields() else {
            return (
                exclude("extraction failed on every backend".to_string()),
                Some(diagnostic),
            );
        };

        let provenance = extraction.provenance();
        let normalized = normalizer.candidate(fields);
        let mut notes = Vec::new();
        if extraction.fallback {
            notes.push(format!(
                "extracted by {} fallback; low confidence",
                provenance.backend
            ));
        }
        if let Some(reason) = &provenance.degraded_reason {
            notes.push(format!("degraded extraction: {reason}"));
        }
        notes.extend(normalized.notes);

        let fields = normalized.value;
        let domain = self.classifier.classify_profile(&fields.skills, &fields.titles);
        let embedding = embed_or_none(self.embedder.as_ref(), &text, self.embedding_timeout).await;

        let profile = Arc::new(CandidateProfile {
            id: candidate.id.clone(),
            raw_text: text,
            fields,
            domain: domain.label.clone(),
            embedding,
            provenance,
        });

        let (compatibility, domain_score) = self.classifier.score(&domain, job_domain);
        let breakdown = self.scorers.breakdown(&profile, job, domain_score);
        let aggregate = self.aggregator.aggregate(&breakdown, compatibility);

        for dimension in &aggregate.redistributed {
            if *dimension == Dimension::Semantic {
                notes.push(
                    "semantic similarity unavailable; its weight was redistributed".to_string(),
                );
            } else {
                notes.push(format!("{dimension} unavailable; its weight was redistributed"));
            }
        }
        if aggregate.gated {
            notes.push(format!(
                "strict domain gate: candidate {} vs job {}; final score forced to 0",
                profile.domain, job.domain
            ));
        } else if compatibility == DomainCompatibility::Mismatch {
            notes.push(format!(
                "domain mismatch ({} vs {}) lowers the domain sub-score",
                profile.domain, job.domain
            ));
        }

        info!(
            candidate = %profile.id,
            backend = %profile.provenance.backend,
            final_score = aggregate.final_score,
            "Candidate scored"
        );

        (
            CandidateOutcome::Scored(ScoredCandidate {
                profile,
                breakdown,
                final_score: aggregate.final_score,
                notes,
            }),
            Some(diagnostic),
        )
    }
}
