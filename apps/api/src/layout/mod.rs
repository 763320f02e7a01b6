// Layout adapters over the rendered blocks: one-page PDF export and HTML preview.
// Both share the static width tables and text styles so wrapping agrees.

pub mod export;
pub mod font_metrics;
pub mod preview;
pub mod style;

pub use export::{ExportAdapter, ExportError};
pub use font_metrics::{a4_page_config, PageConfig};
pub use preview::{PreviewAdapter, PreviewDocument};
