//! Totals and summary rows produced by an extraction run.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

use super::category::{CategoryKey, SummaryLine};

/// Accumulated amount per category.
///
/// Every category is present from construction on, so a category that never
/// matched reads as zero rather than missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals(BTreeMap<CategoryKey, Decimal>);

impl CategoryTotals {
    /// All categories at zero.
    pub fn zero() -> Self {
        Self(CategoryKey::ALL.iter().map(|k| (*k, Decimal::ZERO)).collect())
    }

    /// Total for a category.
    pub fn get(&self, key: CategoryKey) -> Decimal {
        self.0.get(&key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Add an amount to a category. The total is left unchanged on overflow.
    pub fn add(&mut self, key: CategoryKey, amount: Decimal) -> Result<(), ExtractionError> {
        let total = self.0.entry(key).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(amount)
            .ok_or(ExtractionError::AmountOverflow { category: key })?;
        Ok(())
    }

    /// Add every category of `other` into `self`.
    pub fn merge(&mut self, other: &CategoryTotals) -> Result<(), ExtractionError> {
        for (key, amount) in other.iter() {
            self.add(key, amount)?;
        }
        Ok(())
    }

    /// Iterate in category order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryKey, Decimal)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// True when every category is zero.
    pub fn is_zero(&self) -> bool {
        self.0.values().all(|v| v.is_zero())
    }
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self::zero()
    }
}

/// Values recovered from category totals with fixed rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTotals {
    pub base_21: Decimal,
    pub base_105: Decimal,
    pub percepcion_iva_total: Decimal,
}

/// A labelled amount in the presented summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Text shown in the "Concepto" column.
    pub label: String,
    /// Amount rounded to two decimals.
    pub amount: Decimal,
}

impl SummaryRow {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

impl From<(SummaryLine, Decimal)> for SummaryRow {
    fn from((line, amount): (SummaryLine, Decimal)) -> Self {
        Self::new(line.label(), amount)
    }
}

/// Ordered summary handed to presentation and rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    /// Amount of the row with this label, if present.
    pub fn amount_of(&self, label: &str) -> Option<Decimal> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.amount)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
