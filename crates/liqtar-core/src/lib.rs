//! Core library for card settlement statement processing.
//!
//! This crate provides:
//! - PDF page text extraction
//! - Category extraction (commission, VAT, withholdings, perceptions) by rule table
//! - Cross-page aggregation and taxable base derivation
//! - Ordered summary assembly and PDF report rendering

pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod report;
pub mod statement;

pub use error::{LiqtarError, Result};
pub use models::category::{CategoryKey, SummaryLine};
pub use models::config::{LiqtarConfig, RoundingMode};
pub use models::summary::{CategoryTotals, DerivedTotals, Summary, SummaryRow};
pub use pdf::{PageTextSource, PdfExtractor};
pub use pipeline::{load_document, process_document, process_pages, render_report};
pub use report::{PdfReportRenderer, ReportRenderer};
pub use statement::rules::{format_amount, parse_amount};
pub use statement::{ExtractionResult, StatementExtractor, StatementParser};
