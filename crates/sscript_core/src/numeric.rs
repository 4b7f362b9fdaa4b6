//! Numeric literal decoding.
//!
//! The scanner keeps the raw literal text in the token value; these helpers
//! decode it. Integer literals decode to a 64-bit unsigned magnitude (the
//! sign is folded in by the prefix-expression parser). Underscore
//! separators are tolerated in every base.

/// Decode an integer literal (`42`, `0xFF`, `0o777`, `0b1010`, `1_000`)
/// to its unsigned 64-bit magnitude. Returns `None` on overflow or if the
/// text contains no digits.
pub fn parse_integer(text: &str) -> Option<u64> {
    let (radix, digits) = match text.as_bytes() {
        [b'0', b'x' | b'X', rest @ ..] => (16, rest),
        [b'0', b'o' | b'O', rest @ ..] => (8, rest),
        [b'0', b'b' | b'B', rest @ ..] => (2, rest),
        rest => (10, rest),
    };
    let mut value: u64 = 0;
    let mut seen_digit = false;
    for &b in digits {
        if b == b'_' {
            continue;
        }
        let digit = (b as char).to_digit(radix)?;
        value = value
            .checked_mul(radix as u64)?
            .checked_add(digit as u64)?;
        seen_digit = true;
    }
    seen_digit.then_some(value)
}

/// Decode a float literal (`3.14`, `1e10`, `2.5e-3`, `1_000.5`).
pub fn parse_float(text: &str) -> Option<f64> {
    let stripped: String = text.chars().filter(|&c| c != '_').collect();
    stripped.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_decimal() {
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("1_000"), Some(1000));
    }

    #[test]
    fn decodes_prefixed_bases() {
        assert_eq!(parse_integer("0xFF"), Some(255));
        assert_eq!(parse_integer("0Xff"), Some(255));
        assert_eq!(parse_integer("0o777"), Some(511));
        assert_eq!(parse_integer("0b1010"), Some(10));
        assert_eq!(parse_integer("0xFF_FF"), Some(0xFFFF));
    }

    #[test]
    fn rejects_overflow_and_empty() {
        assert_eq!(parse_integer("0x1_0000_0000_0000_0000"), None);
        assert_eq!(parse_integer("0x"), None);
        assert_eq!(parse_integer(""), None);
        // u64::MAX itself still fits
        assert_eq!(
            parse_integer("0xFFFF_FFFF_FFFF_FFFF"),
            Some(u64::MAX)
        );
    }

    #[test]
    fn decodes_floats() {
        assert_eq!(parse_float("3.14"), Some(3.14));
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float("2.5e-1"), Some(0.25));
        assert_eq!(parse_float("1_000.5"), Some(1000.5));
    }
}
