//! Summary Service: LLM first, local templates when the LLM cannot answer.
//!
//! `AppState` holds one `SummaryService`. Its backend is an `Arc<dyn SummaryBackend>`
//! chosen at startup: the Groq client when an API key is configured, otherwise
//! `UnconfiguredBackend`, which always defers to the fallback.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::llm_client::{prompts::SUMMARY_SYSTEM, LlmClient, LlmError};
use crate::models::resume::ResumeRecord;
use crate::summary::cleanup::cleanup_summary;
use crate::summary::fallback::{generate_fallback_summary, RandomPicker, TemplatePicker};
use crate::summary::prompt::build_summary_prompt;

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

/// Produces raw summary text for a prompt.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl SummaryBackend for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.complete(prompt, SUMMARY_SYSTEM).await
    }
}

/// Used when no API key is configured.
pub struct UnconfiguredBackend;

#[async_trait]
impl SummaryBackend for UnconfiguredBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSummary {
    pub summary: String,
    pub source: SummarySource,
}

#[derive(Clone)]
pub struct SummaryService {
    backend: Arc<dyn SummaryBackend>,
    picker: Arc<dyn TemplatePicker>,
}

impl SummaryService {
    pub fn new(backend: Arc<dyn SummaryBackend>, picker: Arc<dyn TemplatePicker>) -> Self {
        Self { backend, picker }
    }

    /// Groq-backed when `GROQ_API_KEY` is set, fallback-only otherwise.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let backend: Arc<dyn SummaryBackend> = match &config.groq_api_key {
            Some(key) => {
                info!(model = crate::llm_client::MODEL, "LLM summary backend enabled");
                Arc::new(LlmClient::new(key.clone())?)
            }
            None => {
                info!("GROQ_API_KEY not set; summaries use the local fallback generator");
                Arc::new(UnconfiguredBackend)
            }
        };
        Ok(Self::new(backend, Arc::new(RandomPicker)))
    }

    /// Never fails: any backend error or empty answer falls back to the templates.
    pub async fn generate(&self, prompt: &str) -> GeneratedSummary {
        match self.backend.generate(prompt).await {
            Ok(raw) => {
                let summary = cleanup_summary(&raw);
                if !summary.is_empty() {
                    debug!(chars = summary.len(), "summary generated by LLM");
                    return GeneratedSummary {
                        summary,
                        source: SummarySource::Llm,
                    };
                }
                warn!("LLM summary was empty after cleanup; using fallback");
            }
            Err(LlmError::NotConfigured) => debug!("no LLM backend; using fallback"),
            Err(e) => warn!(error = %e, "LLM summary generation failed; using fallback"),
        }

        GeneratedSummary {
            summary: generate_fallback_summary(prompt, self.picker.as_ref()),
            source: SummarySource::Fallback,
        }
    }

    pub async fn summarize_record(&self, record: &ResumeRecord) -> GeneratedSummary {
        self.generate(&build_summary_prompt(record)).await
    }
}
