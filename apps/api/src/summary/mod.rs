// Professional summary generation: prompt building, LLM call with cleanup,
// and a template fallback so callers always get a summary back.

pub mod cleanup;
pub mod fallback;
pub mod handlers;
pub mod prompt;
pub mod service;

pub use service::SummaryService;
