//! Statement parser: page scanning, aggregation, derivation and summary.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::{ExtractionConfig, RoundingMode};
use crate::models::summary::{CategoryTotals, DerivedTotals, Summary};

use super::aggregator::Aggregator;
use super::derivation::derive;
use super::rules::PatternRegistry;
use super::scanner::{MalformedMatch, PageScanner};
use super::summary::SummaryBuilder;
use super::Result;

/// Result of a statement extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Presented summary rows.
    pub summary: Summary,
    /// Totals per category read from the text.
    pub totals: CategoryTotals,
    /// Bases and combined perceptions.
    pub derived: DerivedTotals,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Labelled lines skipped for a malformed amount.
    #[serde(skip)]
    pub malformed: Vec<MalformedMatch>,
    /// Number of pages scanned.
    pub pages_scanned: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for statement parsing.
pub trait StatementExtractor {
    /// Extract totals from the text of each page, in page order.
    fn extract_pages(&self, pages: &[String]) -> Result<ExtractionResult>;

    /// Extract totals from a single block of text.
    fn extract_text(&self, text: &str) -> Result<ExtractionResult> {
        self.extract_pages(&[text.to_string()])
    }
}

/// Rule-based parser for card settlement statements.
#[derive(Debug, Clone)]
pub struct StatementParser {
    registry: PatternRegistry,
    /// Abort on the first malformed amount.
    strict: bool,
    rounding: RoundingMode,
    suppress_negative_iva: bool,
}

impl StatementParser {
    /// Create a parser with the standard registry, lenient and half-up.
    pub fn new() -> Self {
        Self {
            registry: PatternRegistry::standard(),
            strict: false,
            rounding: RoundingMode::HalfUp,
            suppress_negative_iva: true,
        }
    }

    /// Create a parser from the extraction section of the config.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_strict(config.strict)
            .with_rounding(config.rounding)
            .with_suppression(config.suppress_negative_iva)
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_suppression(mut self, suppress: bool) -> Self {
        self.suppress_negative_iva = suppress;
        self
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementExtractor for StatementParser {
    fn extract_pages(&self, pages: &[String]) -> Result<ExtractionResult> {
        let start = Instant::now();
        let scanner = PageScanner::new(&self.registry);
        let mut aggregator = Aggregator::new();

        for (index, text) in pages.iter().enumerate() {
            let scan = scanner.scan(index + 1, text)?;

            if self.strict {
                if let Some(bad) = scan.malformed.first() {
                    return Err(ExtractionError::MalformedLine {
                        page: bad.page,
                        category: bad.category,
                        value: bad.value.clone(),
                    });
                }
            }

            aggregator.add_page(scan)?;
        }

        let pages_scanned = aggregator.pages();
        let (totals, malformed) = aggregator.finish();
        let derived = derive(&totals, self.rounding)?;
        let summary = SummaryBuilder::new()
            .with_rounding(self.rounding)
            .with_suppression(self.suppress_negative_iva)
            .build(&totals, &derived);

        let warnings = malformed
            .iter()
            .map(|m| {
                format!(
                    "page {}: skipped malformed amount {:?} for {}",
                    m.page, m.value, m.category
                )
            })
            .collect();

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            pages = pages_scanned,
            skipped = malformed.len(),
            "statement extracted in {}ms",
            processing_time_ms
        );
        debug!(?totals, "category totals");

        Ok(ExtractionResult {
            summary,
            totals,
            derived,
            warnings,
            malformed,
            pages_scanned,
            processing_time_ms,
        })
    }
}
