use crate::ast::Value;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Typed comparison of a stored value against literal text: numbers compare
/// numerically, booleans accept `true`/`false`/`1`/`0`, text compares exactly.
pub fn typed_equals(value: &Value, literal: &str) -> bool {
    match value {
        Value::Number(n) => parse_number(literal).is_some_and(|l| l == *n),
        Value::Bool(b) => parse_bool(literal).is_some_and(|l| l == *b),
        Value::String(s) | Value::Date(s) => s == literal,
        Value::Null => false,
    }
}

/// Case-insensitive comparison of the stringified value with literal text.
pub fn stringified_equals(value: &Value, literal: &str) -> bool {
    value.stringify().to_lowercase() == literal.to_lowercase()
}

/// Two-step equality: typed first, stringified as the fallback.
pub fn loosely_equals(value: &Value, literal: &str) -> bool {
    typed_equals(value, literal) || stringified_equals(value, literal)
}

/// Case-insensitive substring test against the stringified value.
pub fn contains_ignore_case(value: &Value, needle: &str) -> bool {
    value
        .stringify()
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

/// Parse literal text as an exact number. Only plain decimal notation with an
/// optional exponent is accepted, and a value that cannot be represented
/// without losing significant digits is rejected.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if !is_numeric_literal(text) {
        return None;
    }

    let unsigned = text.strip_prefix('+').unwrap_or(text);
    let number = Decimal::from_str(unsigned)
        .or_else(|_| Decimal::from_scientific(unsigned))
        .ok()?;

    let mantissa = unsigned.split(['e', 'E']).next().unwrap_or_default();
    if significant_digits(mantissa) != significant_digits(&number.normalize().to_string()) {
        return None;
    }
    Some(number)
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`. Either side of the point may be
/// empty, not both.
fn is_numeric_literal(text: &str) -> bool {
    let text = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (text, None),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() && fraction.is_empty() {
        return false;
    }
    if !all_digits(whole) || !all_digits(fraction) {
        return false;
    }

    exponent.is_none_or(|e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && all_digits(e)
    })
}

/// Digits of a number without sign, point, leading or trailing zeros.
fn significant_digits(text: &str) -> String {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.trim_matches('0').to_string()
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
