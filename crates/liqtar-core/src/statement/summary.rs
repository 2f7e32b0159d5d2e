//! Ordered summary assembly and display-row suppression.

use rust_decimal::Decimal;

use crate::models::category::{CategoryKey, SummaryLine};
use crate::models::config::RoundingMode;
use crate::models::summary::{CategoryTotals, DerivedTotals, Summary, SummaryRow};

use super::normalize_text;
use super::rules::patterns::NEGATIVE_IVA_LABEL;

/// Builds the presented summary from category and derived totals.
#[derive(Debug, Clone, Copy)]
pub struct SummaryBuilder {
    rounding: RoundingMode,
    suppress_negative_iva: bool,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self {
            rounding: RoundingMode::HalfUp,
            suppress_negative_iva: true,
        }
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_suppression(mut self, suppress: bool) -> Self {
        self.suppress_negative_iva = suppress;
        self
    }

    /// Amount shown for one summary line.
    pub fn amount(&self, line: SummaryLine, totals: &CategoryTotals, derived: &DerivedTotals) -> Decimal {
        let amount = match line {
            SummaryLine::Base21 => derived.base_21,
            SummaryLine::Iva21Total => totals.get(CategoryKey::Iva21),
            SummaryLine::Base105 => derived.base_105,
            SummaryLine::Iva105Total => totals.get(CategoryKey::Iva105),
            SummaryLine::PercepcionesIva => derived.percepcion_iva_total,
            SummaryLine::RetencionesIibb => totals.get(CategoryKey::RetencionIibb),
            SummaryLine::RetencionesIva => totals.get(CategoryKey::RetencionIva),
            SummaryLine::RetencionesGanancias => totals.get(CategoryKey::RetencionGanancias),
        };
        self.rounding.round(amount)
    }

    /// Rows in fixed display order, suppression applied if enabled.
    pub fn build(&self, totals: &CategoryTotals, derived: &DerivedTotals) -> Summary {
        let rows = SummaryLine::ORDER
            .iter()
            .map(|line| SummaryRow::from((*line, self.amount(*line, totals, derived))))
            .collect();

        let summary = Summary { rows };
        if self.suppress_negative_iva {
            suppress_negative_iva(summary)
        } else {
            summary
        }
    }
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// True for labels such as "-IVA ..." or "−IVA ...".
pub fn is_negative_iva_label(label: &str) -> bool {
    NEGATIVE_IVA_LABEL.is_match(&normalize_text(label))
}

/// Drop rows whose label starts with a minus sign before "IVA".
pub fn suppress_negative_iva(summary: Summary) -> Summary {
    Summary {
        rows: summary
            .rows
            .into_iter()
            .filter(|row| !is_negative_iva_label(&row.label))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::derivation::derive;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rows_follow_declared_order() {
        let totals = CategoryTotals::zero();
        let derived = derive(&totals, RoundingMode::HalfUp).unwrap();
        let summary = SummaryBuilder::new().build(&totals, &derived);

        let labels: Vec<&str> = summary.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Base Neto 21% (Arancel + DTO)",
                "IVA 21% Total",
                "Base Neto 10,5% (DTO L.25063 + Costo)",
                "IVA 10,5% Total",
                "Percepciones IVA (RG 2408 Total)",
                "Retenciones IIBB",
                "Retenciones IVA",
                "Retenciones Ganancias",
            ]
        );
        assert!(summary.rows.iter().all(|r| r.amount.is_zero()));
    }

    #[test]
    fn test_amounts_are_placed_by_line() {
        let mut totals = CategoryTotals::zero();
        totals.add(CategoryKey::Iva21, dec("21.00")).unwrap();
        totals.add(CategoryKey::RetencionGanancias, dec("30.00")).unwrap();
        let derived = derive(&totals, RoundingMode::HalfUp).unwrap();
        let summary = SummaryBuilder::new().build(&totals, &derived);

        assert_eq!(summary.amount_of("Base Neto 21% (Arancel + DTO)"), Some(dec("100.00")));
        assert_eq!(summary.amount_of("IVA 21% Total"), Some(dec("21.00")));
        assert_eq!(summary.amount_of("Retenciones Ganancias"), Some(dec("30.00")));
    }

    #[test]
    fn test_suppression() {
        let summary = Summary {
            rows: vec![
                SummaryRow::new("-IVA algo", dec("1.00")),
                SummaryRow::new("\u{2212}IVA algo", dec("2.00")),
                SummaryRow::new("IVA algo", dec("3.00")),
            ],
        };

        let filtered = suppress_negative_iva(summary.clone());

        assert_eq!(filtered.rows, vec![SummaryRow::new("IVA algo", dec("3.00"))]);
        // the input is left untouched
        assert_eq!(summary.len(), 3);
    }

    #[test]
    fn test_is_negative_iva_label() {
        assert!(is_negative_iva_label(" - iva x"));
        assert!(!is_negative_iva_label("Percepciones IVA (RG 2408 Total)"));
    }
}
