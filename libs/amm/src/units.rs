//! Conversion between human decimal strings and integer base units
//!
//! All conversion is done on the digit strings directly so no amount ever
//! passes through a float.

use ethereum_types::U256;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("Empty amount")]
    Empty,

    #[error("Invalid amount: {0:?}")]
    Invalid(String),

    #[error("Amount {0} does not fit in 256 bits")]
    Overflow(String),

    #[error("Unsupported decimals: {0}")]
    Decimals(u8),
}

/// 10^decimals for every ERC-20 decimals value that fits a U256 amount
const MAX_DECIMALS: u8 = 77;

/// Parse `"1.5"` with 18 decimals into `1_500_000_000_000_000_000`
///
/// Fractional digits beyond `decimals` are rounded half-up at the last
/// kept digit.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::Decimals(decimals));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(UnitsError::Empty);
    }

    let invalid = || UnitsError::Invalid(trimmed.to_string());
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let places = decimals as usize;
    let (kept, dropped) = if fraction.len() > places {
        fraction.split_at(places)
    } else {
        (fraction, "")
    };

    let mut digits = String::with_capacity(whole.len() + places);
    digits.push_str(whole);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(places - kept.len()));

    let overflow = || UnitsError::Overflow(trimmed.to_string());
    let mut value = if digits.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&digits).map_err(|_| overflow())?
    };

    if dropped.as_bytes().first().is_some_and(|b| *b >= b'5') {
        value = value.checked_add(U256::one()).ok_or_else(overflow)?;
    }

    Ok(value)
}

/// Render base units as a decimal string, trimming trailing zeros
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let places = decimals as usize;
    if places == 0 {
        return digits;
    }

    let padded = if digits.len() <= places {
        format!("{}{}", "0".repeat(places - digits.len() + 1), digits)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - places);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// A user-entered amount that is worth quoting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteInput {
    pub text: String,
    pub base_units: U256,
}

impl QuoteInput {
    /// `None` when the field is empty, unparseable, or not positive
    pub fn parse(text: &str, decimals: u8) -> Option<QuoteInput> {
        let base_units = parse_units(text, decimals).ok()?;
        if base_units.is_zero() {
            return None;
        }
        Some(QuoteInput {
            text: text.trim().to_string(),
            base_units,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fraction() {
        assert_eq!(parse_units("1.5", 18).unwrap(), U256::from(15) * U256::exp10(17));
        assert_eq!(parse_units("250", 6).unwrap(), U256::from(250_000_000u64));
        assert_eq!(parse_units(" 0.000001 ", 6).unwrap(), U256::one());
        assert_eq!(parse_units(".5", 1).unwrap(), U256::from(5));
        assert_eq!(parse_units("7.", 2).unwrap(), U256::from(700));
    }

    #[test]
    fn test_parse_rounds_half_up() {
        assert_eq!(parse_units("1.2345", 2).unwrap(), U256::from(123));
        assert_eq!(parse_units("1.235", 2).unwrap(), U256::from(124));
        assert_eq!(parse_units("0.9999", 0).unwrap(), U256::from(1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_units("", 18), Err(UnitsError::Empty));
        assert_eq!(parse_units("   ", 18), Err(UnitsError::Empty));
        assert!(matches!(parse_units("-1", 18), Err(UnitsError::Invalid(_))));
        assert!(matches!(parse_units("abc", 18), Err(UnitsError::Invalid(_))));
        assert!(matches!(parse_units("1.2.3", 18), Err(UnitsError::Invalid(_))));
        assert!(matches!(parse_units(".", 18), Err(UnitsError::Invalid(_))));
        assert!(matches!(parse_units("1e18", 18), Err(UnitsError::Invalid(_))));
    }

    #[test]
    fn test_parse_overflow() {
        let huge = "9".repeat(80);
        assert!(matches!(parse_units(&huge, 0), Err(UnitsError::Overflow(_))));
        assert_eq!(parse_units("1", 78), Err(UnitsError::Decimals(78)));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(15) * U256::exp10(17), 18), "1.5");
        assert_eq!(format_units(U256::from(19), 0), "19");
        assert_eq!(format_units(U256::from(1), 6), "0.000001");
        assert_eq!(format_units(U256::from(2_000_000u64), 6), "2");
        assert_eq!(format_units(U256::zero(), 18), "0");
        assert_eq!(format_units(U256::from(2_961_474_103u64), 6), "2961.474103");
    }

    #[test]
    fn test_quote_input_skips_non_positive() {
        assert_eq!(QuoteInput::parse("", 18), None);
        assert_eq!(QuoteInput::parse("0", 18), None);
        assert_eq!(QuoteInput::parse("0.000", 18), None);
        assert_eq!(QuoteInput::parse("-3", 18), None);
        assert_eq!(QuoteInput::parse("ten", 18), None);

        let input = QuoteInput::parse(" 2.5 ", 6).unwrap();
        assert_eq!(input.base_units, U256::from(2_500_000u64));
        assert_eq!(input.text, "2.5");
    }
}
