//! Summary report rendering.

mod pdf;

pub use pdf::PdfReportRenderer;

use crate::error::RenderError;
use crate::models::summary::SummaryRow;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Trait for report renderers.
pub trait ReportRenderer {
    /// Render the summary rows under a title into document bytes.
    fn render(&self, rows: &[SummaryRow], title: &str) -> Result<Vec<u8>>;
}
