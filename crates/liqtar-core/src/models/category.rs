//! Line-item categories recognized on card settlement statements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A class of line item read directly from statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    /// Processing commission (arancel), 21% bracket.
    Arancel,
    /// VAT at 21% on commission and on acquirer financial discount.
    Iva21,
    /// VAT at 10.5% on granted financial discount (Law 25.063) and financial cost.
    Iva105,
    /// Gross receipts tax withholding (IIBB).
    RetencionIibb,
    /// VAT withholding.
    RetencionIva,
    /// Income tax withholding.
    RetencionGanancias,
    /// VAT perception under RG 2408 at 3.00%.
    PercepcionIva300,
    /// VAT perception under RG 2408 at 1.50%.
    PercepcionIva150,
}

impl CategoryKey {
    /// Every category, in declaration order.
    pub const ALL: [CategoryKey; 8] = [
        CategoryKey::Arancel,
        CategoryKey::Iva21,
        CategoryKey::Iva105,
        CategoryKey::RetencionIibb,
        CategoryKey::RetencionIva,
        CategoryKey::RetencionGanancias,
        CategoryKey::PercepcionIva300,
        CategoryKey::PercepcionIva150,
    ];

    /// Short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            CategoryKey::Arancel => "Arancel",
            CategoryKey::Iva21 => "IVA 21%",
            CategoryKey::Iva105 => "IVA 10,5%",
            CategoryKey::RetencionIibb => "Retención IIBB",
            CategoryKey::RetencionIva => "Retención IVA",
            CategoryKey::RetencionGanancias => "Retención Ganancias",
            CategoryKey::PercepcionIva300 => "Percepción IVA RG 2408 3,00%",
            CategoryKey::PercepcionIva150 => "Percepción IVA RG 2408 1,50%",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the presented summary, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLine {
    Base21,
    Iva21Total,
    Base105,
    Iva105Total,
    PercepcionesIva,
    RetencionesIibb,
    RetencionesIva,
    RetencionesGanancias,
}

impl SummaryLine {
    /// Display order of the summary table.
    pub const ORDER: [SummaryLine; 8] = [
        SummaryLine::Base21,
        SummaryLine::Iva21Total,
        SummaryLine::Base105,
        SummaryLine::Iva105Total,
        SummaryLine::PercepcionesIva,
        SummaryLine::RetencionesIibb,
        SummaryLine::RetencionesIva,
        SummaryLine::RetencionesGanancias,
    ];

    /// Label shown in the summary table and the rendered report.
    pub fn label(&self) -> &'static str {
        match self {
            SummaryLine::Base21 => "Base Neto 21% (Arancel + DTO)",
            SummaryLine::Iva21Total => "IVA 21% Total",
            SummaryLine::Base105 => "Base Neto 10,5% (DTO L.25063 + Costo)",
            SummaryLine::Iva105Total => "IVA 10,5% Total",
            SummaryLine::PercepcionesIva => "Percepciones IVA (RG 2408 Total)",
            SummaryLine::RetencionesIibb => "Retenciones IIBB",
            SummaryLine::RetencionesIva => "Retenciones IVA",
            SummaryLine::RetencionesGanancias => "Retenciones Ganancias",
        }
    }
}
