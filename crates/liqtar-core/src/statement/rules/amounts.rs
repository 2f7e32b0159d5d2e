//! Amount normalization for `1.234,56` formatted statements.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ExtractionError;

use super::patterns::AMOUNT_EXACT;

/// Parse a statement amount (e.g. "1.234,56") into a decimal.
///
/// Only the `\d{1,3}(\.\d{3})*,\d{2}` grammar is accepted; anything else is a
/// [`ExtractionError::MalformedAmount`].
pub fn parse_amount(s: &str) -> Result<Decimal, ExtractionError> {
    let malformed = || ExtractionError::MalformedAmount {
        value: s.to_string(),
    };

    if !AMOUNT_EXACT.is_match(s) {
        return Err(malformed());
    }

    let normalized = s.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| malformed())
}

/// Format an amount with `.` thousands and `,` decimals (1234.5 -> "1.234,50").
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2).abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::with_capacity(s.len() + digits.len() / 3 + 1);
    if amount.is_sign_negative() && !amount.round_dp(2).is_zero() {
        formatted.push('-');
    }
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0,00").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("21,00").unwrap(), dec("21.00"));
        assert_eq!(parse_amount("1.234,56").unwrap(), dec("1234.56"));
        assert_eq!(parse_amount("12.345.678,90").unwrap(), dec("12345678.90"));
    }

    #[test]
    fn test_parse_amount_rejects_other_grammars() {
        for bad in ["1234,56", "1,234.56", "1.234,5", "12,345", "-10,00", "1.23,45", "", "abc", "100,00."] {
            assert_eq!(
                parse_amount(bad),
                Err(ExtractionError::MalformedAmount { value: bad.to_string() }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1234.5")), "1.234,50");
        assert_eq!(format_amount(dec("0")), "0,00");
        assert_eq!(format_amount(dec("999.99")), "999,99");
        assert_eq!(format_amount(dec("1000")), "1.000,00");
        assert_eq!(format_amount(dec("12345678.9")), "12.345.678,90");
        assert_eq!(format_amount(dec("-1500.25")), "-1.500,25");
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        let values = [
            "0", "0.01", "0.1", "1", "9.99", "10", "99.5", "100", "999.99", "1000", "1000.01",
            "12345.67", "100000", "999999.99", "1000000", "1234567.89", "98765432.1",
        ];
        for v in values {
            let value = dec(v);
            assert_eq!(parse_amount(&format_amount(value)).unwrap(), value, "round trip of {v}");
        }

        for cents in (0..2_000_000u64).step_by(7_919) {
            let value = Decimal::new(cents as i64, 2);
            assert_eq!(parse_amount(&format_amount(value)).unwrap(), value);
        }
    }
}
