//! Parsing of pt-BR formatted numbers as typed on the calculator form.

use std::str::FromStr;

use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::InvestmentError;

/// Parses a comma-decimal, dot-thousands amount such as `"R$ 1.234,56"`.
///
/// Anything other than digits, commas and a minus sign ahead of the first digit
/// is dropped. The first comma is the decimal separator; further commas are
/// ignored. Empty or unreadable input parses as zero; use
/// [`try_parse_locale_currency`] to tell those apart.
pub fn parse_locale_currency(input: &str) -> Decimal {
    try_parse_locale_currency(input).unwrap_or_default()
}

/// Same rules as [`parse_locale_currency`], but input without any digit or with
/// more digits than a `Decimal` holds is an error.
pub fn try_parse_locale_currency(input: &str) -> Result<Decimal, InvestmentError> {
    let mut digits = String::with_capacity(input.len() + 1);
    let mut negative = false;
    let mut seen_digit = false;
    let mut seen_separator = false;

    for c in input.chars() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                digits.push(c);
            }
            '-' if !seen_digit && !seen_separator => negative = true,
            ',' if !seen_separator => {
                seen_separator = true;
                if digits.is_empty() {
                    digits.push('0');
                }
                digits.push('.');
            }
            _ => {}
        }
    }

    if !seen_digit {
        return Err(InvestmentError::invalid("amount", "no digits"));
    }
    if digits.ends_with('.') {
        digits.pop();
    }

    let value = Decimal::from_str(&digits).map_err(|e| {
        warn!("unreadable amount {input:?}: {e}");
        InvestmentError::invalid("amount", "too many digits")
    })?;
    Ok(if negative { -value } else { value })
}

/// Parses a percentage such as `"10,99"` or `"10,99%"` into a fraction (`0.1099`).
pub fn parse_locale_percentage(input: &str) -> Decimal {
    parse_locale_currency(input) / dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("1.234,56", dec!(1234.56))]
    #[case("R$ 300.000,00", dec!(300000))]
    #[case("450000", dec!(450000))]
    #[case("  27.000 ", dec!(27000))]
    #[case("0,5", dec!(0.5))]
    #[case(",75", dec!(0.75))]
    #[case("1.234,", dec!(1234))]
    #[case("1,234,5", dec!(1.2345))]
    #[case("-1.500,25", dec!(-1500.25))]
    #[case("R$ -1.500,00", dec!(-1500))]
    #[case("- 300", dec!(-300))]
    #[case("12-3", dec!(123))]
    #[case("", dec!(0))]
    #[case("R$", dec!(0))]
    #[case("-", dec!(0))]
    #[case("abc", dec!(0))]
    fn test_parse_locale_currency(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_locale_currency(input), expected);
    }

    #[rstest]
    #[case("", "no digits")]
    #[case("R$ -", "no digits")]
    #[case("100.000.000.000.000.000.000.000.000.000", "too many digits")]
    fn test_try_parse_reports_unreadable_input(#[case] input: &str, #[case] reason: &str) {
        assert_eq!(
            try_parse_locale_currency(input),
            Err(InvestmentError::invalid("amount", reason))
        );
        assert_eq!(parse_locale_currency(input), dec!(0));
    }

    #[test]
    fn test_try_parse_accepts_plain_amount() {
        assert_eq!(try_parse_locale_currency("R$ 2.864,67"), Ok(dec!(2864.67)));
    }

    #[rstest]
    #[case("10,99", dec!(0.1099))]
    #[case("20%", dec!(0.2))]
    #[case("", dec!(0))]
    fn test_parse_locale_percentage(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_locale_percentage(input), expected);
    }
}
