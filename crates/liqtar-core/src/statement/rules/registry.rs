//! Declarative table of pattern rules, one or more per category.

use regex::Regex;

use crate::models::category::CategoryKey;

use super::ExtractionMatch;
use super::patterns::*;

/// Where a rule finds the amount inside its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountCapture {
    /// A named capture group.
    Named(&'static str),
    /// The first numeric token anywhere in the matched text.
    FirstToken,
}

/// How repeated matches of a rule on one page combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// Every match adds to the category.
    Additive,
    /// Only the first match on a page counts.
    FirstOnly,
}

/// A label expression bound to one category.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub category: CategoryKey,
    /// Identifier used in logs and warnings.
    pub name: &'static str,
    regex: Regex,
    pub capture: AmountCapture,
    pub accumulation: Accumulation,
}

impl PatternRule {
    /// Additive rule reading the `amount` group.
    pub fn new(category: CategoryKey, name: &'static str, regex: Regex) -> Self {
        Self {
            category,
            name,
            regex,
            capture: AmountCapture::Named("amount"),
            accumulation: Accumulation::Additive,
        }
    }

    pub fn with_capture(mut self, capture: AmountCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }

    /// Raw amount tokens found by this rule, in text order.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<ExtractionMatch<&'t str>> {
        let mut results = Vec::new();

        for caps in self.regex.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            let token = match self.capture {
                AmountCapture::Named(group) => caps.name(group),
                AmountCapture::FirstToken => AMOUNT_TOKEN.find(full_match.as_str()),
            };
            let Some(token) = token else {
                continue;
            };

            results.push(
                ExtractionMatch::new(token.as_str(), self.name, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results
    }
}

/// Ordered set of rules applied to every page.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    rules: Vec<PatternRule>,
}

impl PatternRegistry {
    /// Registry for Maestro/Mastercard settlement statements.
    pub fn standard() -> Self {
        let rules = CategoryKey::ALL
            .iter()
            .flat_map(|category| standard_rules(*category))
            .collect();
        Self { rules }
    }

    /// Registry from an explicit rule list.
    pub fn from_rules(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Rules bound to one category.
    pub fn rules_for(&self, category: CategoryKey) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter().filter(move |r| r.category == category)
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_rules(category: CategoryKey) -> Vec<PatternRule> {
    let rule = |name: &'static str, regex: &Regex| PatternRule::new(category, name, regex.clone());

    match category {
        CategoryKey::Arancel => vec![rule("arancel", &*ARANCEL)],
        CategoryKey::Iva21 => vec![
            rule("iva_21_arancel", &*IVA_21_ARANCEL),
            rule("iva_21_dto_fin_adq", &*IVA_21_DTO_FIN_ADQ),
        ],
        CategoryKey::Iva105 => vec![
            rule("iva_105_l25063", &*IVA_105_L25063),
            rule("iva_105_costo_financiero", &*IVA_105_COSTO_FIN),
        ],
        CategoryKey::RetencionIibb => vec![rule("retencion_iibb", &*RETENCION_IIBB)],
        CategoryKey::RetencionIva => vec![rule("retencion_iva", &*RETENCION_IVA)],
        CategoryKey::RetencionGanancias => vec![
            rule("retencion_ganancias", &*RETENCION_GANANCIAS)
                .with_capture(AmountCapture::FirstToken),
        ],
        CategoryKey::PercepcionIva300 => vec![rule("percepcion_iva_300", &*PERCEPCION_IVA_300)],
        CategoryKey::PercepcionIva150 => vec![rule("percepcion_iva_150", &*PERCEPCION_IVA_150)],
    }
}
