//! Category extraction for card settlement statements.

mod aggregator;
mod derivation;
mod parser;
pub mod rules;
mod scanner;
mod summary;

pub use aggregator::Aggregator;
pub use derivation::{
    base_from_tax, derive, vat_rate, IVA_RATE_GENERAL, IVA_RATE_REDUCED,
    PERCEPCION_RG2408_GENERAL, PERCEPCION_RG2408_REDUCED,
};
pub use parser::{ExtractionResult, StatementExtractor, StatementParser};
pub use scanner::{normalize_text, MalformedMatch, PageScan, PageScanner};
pub use summary::{is_negative_iva_label, suppress_negative_iva, SummaryBuilder};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
