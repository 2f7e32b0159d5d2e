//! Taxable bases and combined perceptions computed from category totals.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::category::CategoryKey;
use crate::models::config::RoundingMode;
use crate::models::summary::{CategoryTotals, DerivedTotals};

use super::Result;

/// IVA general rate, Ley de IVA art. 28 (21%).
pub const IVA_RATE_GENERAL: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

/// IVA reduced rate on financial discounts, Ley 25.063 (10.5%).
pub const IVA_RATE_REDUCED: Decimal = Decimal::from_parts(105, 0, 0, false, 3);

/// IVA perception rate, AFIP RG 2408 (3.00%).
pub const PERCEPCION_RG2408_GENERAL: Decimal = Decimal::from_parts(300, 0, 0, false, 4);

/// IVA perception rate, AFIP RG 2408 (1.50%).
pub const PERCEPCION_RG2408_REDUCED: Decimal = Decimal::from_parts(150, 0, 0, false, 4);

/// Rate a VAT category was charged at. Fixed per category, never read from input.
pub fn vat_rate(category: CategoryKey) -> Option<Decimal> {
    match category {
        CategoryKey::Iva21 => Some(IVA_RATE_GENERAL),
        CategoryKey::Iva105 => Some(IVA_RATE_REDUCED),
        CategoryKey::PercepcionIva300 => Some(PERCEPCION_RG2408_GENERAL),
        CategoryKey::PercepcionIva150 => Some(PERCEPCION_RG2408_REDUCED),
        CategoryKey::Arancel
        | CategoryKey::RetencionIibb
        | CategoryKey::RetencionIva
        | CategoryKey::RetencionGanancias => None,
    }
}

/// Recover the taxable base behind a VAT category total:
/// `round(tax / rate, 2)`, or zero when there is no positive tax.
pub fn base_from_tax(
    category: CategoryKey,
    tax_total: Decimal,
    rounding: RoundingMode,
) -> Result<Decimal> {
    let Some(rate) = vat_rate(category) else {
        return Ok(Decimal::ZERO);
    };
    if tax_total <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let base = tax_total
        .checked_div(rate)
        .ok_or(ExtractionError::AmountOverflow { category })?;
    Ok(rounding.round(base))
}

/// Compute the derived totals of a document.
pub fn derive(totals: &CategoryTotals, rounding: RoundingMode) -> Result<DerivedTotals> {
    let base_21 = base_from_tax(CategoryKey::Iva21, totals.get(CategoryKey::Iva21), rounding)?;
    let base_105 = base_from_tax(CategoryKey::Iva105, totals.get(CategoryKey::Iva105), rounding)?;

    let percepciones = totals
        .get(CategoryKey::PercepcionIva300)
        .checked_add(totals.get(CategoryKey::PercepcionIva150))
        .ok_or(ExtractionError::AmountOverflow {
            category: CategoryKey::PercepcionIva150,
        })?;
    let percepcion_iva_total = rounding.round(percepciones);

    debug!(%base_21, %base_105, %percepcion_iva_total, "derived totals");

    Ok(DerivedTotals {
        base_21,
        base_105,
        percepcion_iva_total,
    })
}
