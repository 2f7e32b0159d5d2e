//! Regex patterns for card settlement statement lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Everything between a label and its amount on the same line, then the
/// first numeric token. The token is deliberately loose so that a label
/// followed by a badly formatted number is seen and reported instead of
/// silently ignored.
const AMOUNT_TAIL: &str = r"[^0-9\n]*(?P<amount>\d(?:[\d.,]*\d)?)";

fn labelled(label: &str) -> Regex {
    Regex::new(&format!("(?i){label}{AMOUNT_TAIL}")).unwrap()
}

lazy_static! {
    // Amount grammar: 1.234.567,89
    pub static ref AMOUNT: Regex = Regex::new(
        r"\d{1,3}(?:\.\d{3})*,\d{2}"
    ).unwrap();

    pub static ref AMOUNT_EXACT: Regex = Regex::new(
        r"^\d{1,3}(?:\.\d{3})*,\d{2}$"
    ).unwrap();

    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"\d(?:[\d.,]*\d)?"
    ).unwrap();

    // Commission
    pub static ref ARANCEL: Regex = labelled(r"ARANCEL");

    // VAT 21%
    pub static ref IVA_21_ARANCEL: Regex = labelled(
        r"IVA\s*CRED\.FISC\.COMERCIO\s*S/ARANC\s*21,00%"
    );

    pub static ref IVA_21_DTO_FIN_ADQ: Regex = labelled(
        r"IVA\s*S/DTO\s*FIN\s*ADQ\s*CONT\s*21,00%"
    );

    // VAT 10.5%
    pub static ref IVA_105_L25063: Regex = labelled(
        r"IVA\s*CRED\.FISC\.COM\.L\.25063\s*S/DTO\s*F\.OTOR\s*10,50%"
    );

    pub static ref IVA_105_COSTO_FIN: Regex = labelled(
        r"IVA\s*S/COSTO\s*FINANCIERO\s*10,50%"
    );

    // Withholdings
    pub static ref RETENCION_IIBB: Regex = labelled(
        r"RETENCI[ÓO]N\s*ING\.?\s*BRUTOS"
    );

    pub static ref RETENCION_IVA: Regex = labelled(
        r"RETENCI[ÓO]N\s*IVA"
    );

    // The alternation keeps its own group; the amount is located by token
    // search over the whole match rather than by group index.
    pub static ref RETENCION_GANANCIAS: Regex = Regex::new(
        r"(?i)RETENCI[ÓO]N\s*(IMP\.?\s*GANANCIAS|GANANCIAS)[^0-9\n]*\d(?:[\d.,]*\d)?"
    ).unwrap();

    // VAT perceptions, RG 2408
    pub static ref PERCEPCION_IVA_300: Regex = labelled(
        r"PERCEPCI[ÓO]N\s*IVA\s*(?:R\.?\s*G\.?|RG)\s*2408\s*3,00\s*%"
    );

    pub static ref PERCEPCION_IVA_150: Regex = labelled(
        r"PERCEPCI[ÓO]N\s*IVA\s*(?:R\.?\s*G\.?|RG)\s*2408\s*1,50\s*%"
    );

    // Summary labels starting with a minus sign before "IVA"
    pub static ref NEGATIVE_IVA_LABEL: Regex = Regex::new(
        r"(?i)^\s*[\-\u{2212}]\s*IVA\b"
    ).unwrap();
}
