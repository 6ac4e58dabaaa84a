//! Extraction Orchestrator: Gets structured fields out of raw text by walking
//! an ordered chain of backends.
//!
//! Each backend is attempted exactly once, in order. The first one that
//! returns structurally valid output wins. LLM calls are gated by a shared
//! semaphore and bounded by a per-call timeout; a timeout counts as a failed
//! call. The regex backend sits last and never fails.

pub mod llm;
pub mod regex;
pub mod validate;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::errors::BackendError;
use crate::models::{Confidence, DocumentRole, ExtractionResult, Provenance};

/// One extraction capability: text plus role in, fields out.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    fn name(&self) -> &str;

    /// LLM backends share the concurrency limiter and run under the timeout.
    fn uses_llm(&self) -> bool {
        true
    }

    async fn extract(
        &self,
        text: &str,
        role: DocumentRole,
    ) -> Result<ExtractionResult, BackendError>;
}

/// Diagnostics for one backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendAttempt {
    pub backend: String,
    /// `None` on success.
    pub error: Option<String>,
}

/// What the orchestrator produced for one document, and how.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestratedExtraction {
    pub result: ExtractionResult,
    /// The backend whose output was accepted.
    pub backend: Option<String>,
    /// True when the accepted output came from a non-LLM backend.
    pub fallback: bool,
    pub attempts: Vec<BackendAttempt>,
}

impl OrchestratedExtraction {
    /// High only for clean LLM output.
    pub fn confidence(&self) -> Confidence {
        if self.fallback || !self.result.is_success() {
            Confidence::Low
        } else {
            Confidence::High
        }
    }

    pub fn provenance(&self) -> Provenance {
        Provenance {
            backend: self.backend.clone().unwrap_or_else(|| "none".to_string()),
            confidence: self.confidence(),
            degraded_reason: self.result.degraded_reason().map(String::from),
        }
    }
}

pub struct ExtractionOrchestrator {
    backends: Vec<Arc<dyn ExtractionBackend>>,
    llm_permits: Arc<Semaphore>,
    call_timeout: Duration,
}

impl ExtractionOrchestrator {
    pub fn new(
        backends: Vec<Arc<dyn ExtractionBackend>>,
        max_concurrent_llm_calls: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            backends,
            llm_permits: Arc::new(Semaphore::new(max_concurrent_llm_calls.max(1))),
            call_timeout,
        }
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub async fn extract(&self, text: &str, role: DocumentRole) -> OrchestratedExtraction {
        let mut attempts = Vec::with_capacity(self.backends.len());

        for backend in &self.backends {
            let outcome = self.attempt(backend.as_ref(), text, role).await;
            match outcome {
                Ok(ExtractionResult::Failed(reason)) => {
                    warn!(
                        backend = backend.name(),
                        %role,
                        %reason,
                        "Backend reported failure, falling back"
                    );
                    attempts.push(BackendAttempt {
                        backend: backend.name().to_string(),
                        error: Some(reason),
                    });
                }
                Ok(result) => {
                    info!(
                        backend = backend.name(),
                        %role,
                        attempts = attempts.len() + 1,
                        "Extraction succeeded"
                    );
                    attempts.push(BackendAttempt {
                        backend: backend.name().to_string(),
                        error: None,
                    });
                    return OrchestratedExtraction {
                        result,
                        backend: Some(backend.name().to_string()),
                        fallback: !backend.uses_llm(),
                        attempts,
                    };
                }
                Err(e) => {
                    warn!(
                        backend = backend.name(),
                        %role,
                        error = %e,
                        "Backend failed, falling back"
                    );
                    attempts.push(BackendAttempt {
                        backend: backend.name().to_string(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let reason = if attempts.is_empty() {
            "no extraction backends configured".to_string()
        } else {
            format!("all {} extraction backends failed", attempts.len())
        };
        OrchestratedExtraction {
            result: ExtractionResult::Failed(reason),
            backend: None,
            fallback: false,
            attempts,
        }
    }

    async fn attempt(
        &self,
        backend: &dyn ExtractionBackend,
        text: &str,
        role: DocumentRole,
    ) -> Result<ExtractionResult, BackendError> {
        if !backend.uses_llm() {
            return backend.extract(text, role).await;
        }

        let _permit = self
            .llm_permits
            .acquire()
            .await
            .map_err(|e| BackendError::Transport(format!("concurrency limiter closed: {e}")))?;

        match tokio::time::timeout(self.call_timeout, backend.extract(text, role)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.call_timeout)),
        }
    }
}
