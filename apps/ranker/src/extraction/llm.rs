use async_trait::async_trait;
use tracing::debug;

use crate::errors::BackendError;
use crate::extraction::validate::validate;
use crate::extraction::ExtractionBackend;
use crate::llm_client::prompts::{JOB_EXTRACTION_PROMPT, JSON_ONLY_SYSTEM, RESUME_EXTRACTION_PROMPT};
use crate::llm_client::LlmClient;
use crate::models::{DocumentRole, ExtractedFields, ExtractionResult};

/// Characters of document text sent to the model.
pub const RESUME_CHAR_LIMIT: usize = 3000;
pub const JOB_CHAR_LIMIT: usize = 2000;

/// One model tier of the LLM chain.
pub struct LlmExtractor {
    client: LlmClient,
    model: String,
    name: String,
}

impl LlmExtractor {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            client,
            name: format!("llm:{model}"),
            model,
        }
    }
}

#[async_trait]
impl ExtractionBackend for LlmExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(
        &self,
        text: &str,
        role: DocumentRole,
    ) -> Result<ExtractionResult, BackendError> {
        let prompt = build_prompt(text, role);
        debug!(model = %self.model, %role, prompt_chars = prompt.len(), "Calling LLM extractor");

        let fields: ExtractedFields = self
            .client
            .call_json(&self.model, &prompt, JSON_ONLY_SYSTEM)
            .await?;

        validate(fields, role)
    }
}

pub fn build_prompt(text: &str, role: DocumentRole) -> String {
    let (template, limit) = match role {
        DocumentRole::Resume => (RESUME_EXTRACTION_PROMPT, RESUME_CHAR_LIMIT),
        DocumentRole::JobDescription => (JOB_EXTRACTION_PROMPT, JOB_CHAR_LIMIT),
    };
    template.replace("{text}", truncate_chars(text, limit))
}

/// Longest prefix of at most `limit` chars, cut on a char boundary.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
