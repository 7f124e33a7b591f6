//! Conversion between typed values and their stored text.
//!
//! The text forms follow the browser conventions of the data this crate shares storage
//! with: numbers are written like JavaScript's `Number#toString`, records and arrays as
//! compact JSON, and numbers are read back with the rules of `Number(text)`.
//!
//! Whole-number floats nested in records and arrays are written without a fraction
//! (`1.0` becomes `1`), as `JSON.stringify` does.

use serde_json::{Map, Number, Value};

use crate::errors::{ParseError, StorageError};
use crate::storage::value::StorageValue;

/// Produces the stored text for `value`.
pub fn prepare_value(value: &StorageValue) -> Result<String, StorageError> {
    match value {
        StorageValue::String(s) => Ok(s.clone()),
        StorageValue::Boolean(b) => Ok(b.to_string()),
        StorageValue::Number(n) => Ok(format_number(*n)),
        StorageValue::Record(m) => serde_json::to_string(&normalize_map(m))
            .map_err(|_| StorageError::InvalidValueType),
        StorageValue::Array(a) => {
            let a: Vec<Value> = a.iter().map(normalize_numbers).collect();
            serde_json::to_string(&a).map_err(|_| StorageError::InvalidValueType)
        }
    }
}

fn normalize_map(m: &Map<String, Value>) -> Map<String, Value> {
    m.iter()
        .map(|(k, v)| (k.clone(), normalize_numbers(v)))
        .collect()
}

/// Rewrites integral floats as integers so they serialize without a fraction.
fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Value::Number(Number::from(f as i64))
            }
            _ => value.clone(),
        },
        Value::Array(a) => Value::Array(a.iter().map(normalize_numbers).collect()),
        Value::Object(m) => Value::Object(normalize_map(m)),
        _ => value.clone(),
    }
}

/// Formats `n` the way JavaScript's `Number#toString` does.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }

    let s = format!("{n:e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

/// JavaScript `WhiteSpace` and `LineTerminator` code points.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{b}'
            | '\u{c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Parses `text` with the rules of JavaScript's `Number(text)`, except that empty or
/// blank text is not a number.
pub fn parse_number(text: &str) -> Result<f64, ParseError> {
    let t = text.trim_matches(is_js_whitespace);
    if t.is_empty() {
        return Err(ParseError::NotANumber);
    }

    match t {
        "Infinity" | "+Infinity" => return Ok(f64::INFINITY),
        "-Infinity" => return Ok(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match t.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &t[2..];
        if digits.is_empty() {
            return Err(ParseError::NotANumber);
        }
        return digits
            .chars()
            .try_fold(0f64, |acc, c| {
                c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
            })
            .ok_or(ParseError::NotANumber);
    }

    // Rust accepts "inf"/"nan" spellings that JavaScript does not.
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return Err(ParseError::NotANumber);
    }

    match t.parse::<f64>() {
        Ok(n) if !n.is_nan() => Ok(n),
        _ => Err(ParseError::NotANumber),
    }
}

/// Accepts exactly `"true"` and `"false"`.
pub fn parse_boolean(text: &str) -> Result<bool, ParseError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::NotABoolean),
    }
}

/// Parses `text` as JSON; only objects and arrays count as records.
pub fn parse_record(text: &str) -> Result<Value, ParseError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        _ => Err(ParseError::NotARecord),
    }
}

/// Parses `text` as a JSON array.
pub fn parse_array(text: &str) -> Result<Vec<Value>, ParseError> {
    match parse_record(text)? {
        Value::Array(a) => Ok(a),
        _ => Err(ParseError::NotAnArray),
    }
}
