//! Cross-page accumulation of category totals.

use tracing::debug;

use crate::models::summary::CategoryTotals;

use super::scanner::{MalformedMatch, PageScan};
use super::Result;

/// Accumulates page scans of a single document.
///
/// One aggregator per document; it is never shared between runs.
#[derive(Debug, Default)]
pub struct Aggregator {
    totals: CategoryTotals,
    malformed: Vec<MalformedMatch>,
    pages: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one page into the running totals.
    pub fn add_page(&mut self, scan: PageScan) -> Result<()> {
        debug!(
            page = scan.page,
            matches = scan.matches.len(),
            malformed = scan.malformed.len(),
            "page scanned"
        );
        self.totals.merge(&scan.totals)?;
        self.malformed.extend(scan.malformed);
        self.pages += 1;
        Ok(())
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn totals(&self) -> &CategoryTotals {
        &self.totals
    }

    /// Malformed matches seen so far, in page order of arrival.
    pub fn malformed(&self) -> &[MalformedMatch] {
        &self.malformed
    }

    pub fn finish(self) -> (CategoryTotals, Vec<MalformedMatch>) {
        (self.totals, self.malformed)
    }
}
