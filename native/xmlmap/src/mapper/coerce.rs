//! Value Coercion
//!
//! Text from attributes and elements becomes a typed scalar. Only strings
//! that pass the numeric-form check are handed to a number parser.

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericForm {
    /// `0x1F`
    Hex,
    /// `42`, `007`
    Integer,
    /// `-1`, `3.14`, `.5`, `1e3`
    Decimal,
}

/// Coerce text, mapping the empty string to `Null`
#[inline]
pub fn coerce(text: &str) -> Value {
    coerce_or(text, Value::Null)
}

/// Coerce text, mapping the empty string to `default`
pub fn coerce_or(text: &str, default: Value) -> Value {
    if text.is_empty() {
        return default;
    }

    if let Some(form) = numeric_form(text) {
        return parse_number(text, form);
    }

    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    Value::String(text.to_string())
}

fn numeric_form(text: &str) -> Option<NumericForm> {
    if let Some(digits) = text.strip_prefix("0x") {
        let is_hex = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit());
        return is_hex.then_some(NumericForm::Hex);
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return Some(NumericForm::Integer);
    }

    is_decimal(text.as_bytes()).then_some(NumericForm::Decimal)
}

/// `[+-]? digits? ('.' digits?)? ([eE] [+-]? digits)?` with at least one mantissa digit
fn is_decimal(bytes: &[u8]) -> bool {
    fn digits(bytes: &[u8], from: usize) -> usize {
        bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
    }

    let mut pos = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = digits(bytes, pos);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = digits(bytes, pos);
        pos += frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = digits(bytes, pos);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

fn parse_number(text: &str, form: NumericForm) -> Value {
    match form {
        NumericForm::Hex => {
            let digits = &text[2..];
            i64::from_str_radix(digits, 16)
                .map(Value::Int)
                .unwrap_or_else(|_| hex_as_float(text, digits))
        }
        NumericForm::Integer => text
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| parse_float(text)),
        NumericForm::Decimal => parse_float(text),
    }
}

/// Integers past `i64` degrade to floats; overflow to infinity keeps the text
fn parse_float(text: &str) -> Value {
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Float(n),
        _ => Value::String(text.to_string()),
    }
}

fn hex_as_float(text: &str, digits: &str) -> Value {
    let n = digits
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0.0_f64, |acc, d| acc * 16.0 + f64::from(d));

    if n.is_finite() {
        Value::Float(n)
    } else {
        Value::String(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", Value::Int(42))]
    #[case("007", Value::Int(7))]
    #[case("0x1F", Value::Int(31))]
    #[case("0xff", Value::Int(255))]
    #[case("2.75", Value::Float(2.75))]
    #[case("-5", Value::Float(-5.0))]
    #[case("+1.5", Value::Float(1.5))]
    #[case(".5", Value::Float(0.5))]
    #[case("1e3", Value::Float(1000.0))]
    #[case("2.5E-1", Value::Float(0.25))]
    #[case("true", Value::Bool(true))]
    #[case("FALSE", Value::Bool(false))]
    #[case("TrUe", Value::Bool(true))]
    #[case("hello", Value::String("hello".into()))]
    fn test_coerce(#[case] text: &str, #[case] expected: Value) {
        assert_eq!(coerce(text), expected);
    }

    #[rstest]
    #[case("0x")]
    #[case("0xZZ")]
    #[case("1.2.3")]
    #[case("1e")]
    #[case("-")]
    #[case(".")]
    #[case("12abc")]
    #[case(" 5")]
    #[case("inf")]
    #[case("NaN")]
    #[case("yes")]
    fn test_non_numeric_stays_string(#[case] text: &str) {
        assert_eq!(coerce(text), Value::String(text.to_string()));
    }

    #[test]
    fn test_empty_uses_default() {
        assert_eq!(coerce(""), Value::Null);
        assert_eq!(coerce_or("", Value::Bool(false)), Value::Bool(false));
    }

    #[test]
    fn test_out_of_range_numbers() {
        assert_eq!(coerce("99999999999999999999"), Value::Float(1e20));
        assert_eq!(coerce("0x10000000000000000"), Value::Float(18446744073709551616.0));
        assert_eq!(coerce("1e999"), Value::String("1e999".into()));
    }
}
