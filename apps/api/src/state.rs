use crate::config::Config;
use crate::layout::PageConfig;
use crate::summary::SummaryService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// LLM-backed when configured; always able to answer through its fallback.
    pub summaries: SummaryService,
    /// Page geometry for PDF export (A4).
    pub page_config: PageConfig,
}
