//! Per-page application of the pattern registry.

use std::borrow::Cow;

use rust_decimal::Decimal;
use tracing::{trace, warn};

use crate::models::category::CategoryKey;
use crate::models::summary::CategoryTotals;

use super::rules::{parse_amount, Accumulation, ExtractionMatch, PatternRegistry};
use super::Result;

/// Unicode minus sign, seen in place of `-` in some statements.
const UNICODE_MINUS: char = '\u{2212}';

/// A labelled line whose amount did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedMatch {
    /// Page number (1-indexed).
    pub page: usize,
    pub category: CategoryKey,
    pub rule: &'static str,
    /// The token found after the label.
    pub value: String,
    /// The whole matched line fragment.
    pub source: String,
}

/// Result of scanning one page.
#[derive(Debug, Clone)]
pub struct PageScan {
    /// Page number (1-indexed).
    pub page: usize,
    /// Sum of matched amounts per category.
    pub totals: CategoryTotals,
    /// Amounts that contributed to `totals`.
    pub matches: Vec<ExtractionMatch<Decimal>>,
    /// Labelled lines skipped because their amount was malformed.
    pub malformed: Vec<MalformedMatch>,
}

/// Fold both minus glyphs into `-`.
pub fn normalize_text(text: &str) -> Cow<'_, str> {
    if text.contains(UNICODE_MINUS) {
        Cow::Owned(text.replace(UNICODE_MINUS, "-"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Applies every rule of a registry to page text.
pub struct PageScanner<'r> {
    registry: &'r PatternRegistry,
}

impl<'r> PageScanner<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    /// Scan one page. Empty text yields all-zero totals.
    pub fn scan(&self, page: usize, text: &str) -> Result<PageScan> {
        let text = normalize_text(text);
        let mut scan = PageScan {
            page,
            totals: CategoryTotals::zero(),
            matches: Vec::new(),
            malformed: Vec::new(),
        };

        for rule in self.registry.rules() {
            for found in rule.find_all(&text) {
                match parse_amount(found.value) {
                    Ok(amount) => {
                        trace!(page, rule = rule.name, %amount, "matched");
                        scan.totals.add(rule.category, amount)?;
                        scan.matches.push(found.map(|_| amount));
                        if rule.accumulation == Accumulation::FirstOnly {
                            break;
                        }
                    }
                    Err(_) => {
                        warn!(page, rule = rule.name, value = found.value, "skipping malformed amount");
                        scan.malformed.push(MalformedMatch {
                            page,
                            category: rule.category,
                            rule: rule.name,
                            value: found.value.to_string(),
                            source: found.source.clone(),
                        });
                    }
                }
            }
        }

        Ok(scan)
    }
}
