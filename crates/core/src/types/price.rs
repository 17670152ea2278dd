//! Moroccan dirham (MAD) price formatting.
//!
//! All money in the catalog and carts is decimal MAD. Display formatting
//! follows the Moroccan convention: thousands grouped with spaces, a decimal
//! comma, two fraction digits and a trailing currency code, e.g.
//! `45 000,00 MAD`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as a MAD price string.
///
/// The amount is rounded to two decimal places (midpoint away from zero)
/// before formatting.
///
/// ## Examples
///
/// ```
/// use almas_dimas_core::format_mad;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_mad(Decimal::new(45_000, 0)), "45 000,00 MAD");
/// assert_eq!(format_mad(Decimal::new(95_050, 2)), "950,50 MAD");
/// ```
#[must_use]
pub fn format_mad(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = int_part.len();
    let mut out = String::with_capacity(digits + digits / 3 + 8);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(digit);
    }
    out.push(',');
    out.push_str(frac_part);
    out.push_str(" MAD");
    out
}

/// Parse a formatted MAD price back into a decimal amount.
///
/// Tolerates the display format produced by [`format_mad`] as well as the
/// dotted-thousands variant (`45.000,00 MAD`) and bare numbers. Currency
/// markers, whitespace and thousands separators are stripped, the decimal
/// comma is converted, and anything unparsable yields zero rather than an
/// error.
///
/// ## Examples
///
/// ```
/// use almas_dimas_core::parse_mad;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_mad("45 000,00 MAD"), Decimal::new(45_000, 0));
/// assert_eq!(parse_mad("n/a"), Decimal::ZERO);
/// ```
#[must_use]
pub fn parse_mad(formatted: &str) -> Decimal {
    let cleaned: String = formatted
        .replace("MAD", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let prefix = leading_number(&cleaned);
    let prefix = prefix.strip_suffix('.').unwrap_or(prefix);
    prefix.parse().unwrap_or_default()
}

/// Longest prefix of `s` that looks like a signed decimal number.
fn leading_number(s: &str) -> &str {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '-' | '+' if i == 0 => end = 1,
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }
    s.get(..end).unwrap_or("")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_mad(Decimal::new(45_000, 0)), "45 000,00 MAD");
        assert_eq!(format_mad(Decimal::new(1_234_567_89, 2)), "1 234 567,89 MAD");
    }

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_mad(Decimal::new(950, 0)), "950,00 MAD");
        assert_eq!(format_mad(Decimal::ZERO), "0,00 MAD");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_mad(Decimal::new(-1_500_50, 2)), "-1 500,50 MAD");
    }

    #[test]
    fn test_format_rounds_to_two_decimals() {
        assert_eq!(format_mad(Decimal::new(99_999, 3)), "100,00 MAD");
        assert_eq!(format_mad(Decimal::new(12_345, 3)), "12,35 MAD");
    }

    #[test]
    fn test_parse_display_format() {
        assert_eq!(parse_mad("45 000,00 MAD"), Decimal::new(45_000, 0));
        assert_eq!(parse_mad("950,50 MAD"), Decimal::new(950_50, 2));
    }

    #[test]
    fn test_parse_dotted_thousands() {
        assert_eq!(parse_mad("45.000,00 MAD"), Decimal::new(45_000, 0));
    }

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse_mad("1200,5"), Decimal::new(1200_5, 1));
        assert_eq!(parse_mad("-99,90 MAD"), Decimal::new(-99_90, 2));
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_mad(""), Decimal::ZERO);
        assert_eq!(parse_mad("gratuit"), Decimal::ZERO);
        assert_eq!(parse_mad("MAD"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_ignores_trailing_junk() {
        assert_eq!(parse_mad("1200,50DH"), Decimal::new(1200_50, 2));
    }

    #[test]
    fn test_round_trip() {
        let amount = Decimal::new(123_456_78, 2);
        assert_eq!(parse_mad(&format_mad(amount)), amount);
    }
}
