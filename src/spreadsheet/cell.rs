use serde_json::Value;
use std::fmt::Display;

/// A single value read from a sheet.
///
/// The values endpoint returns strings, numbers and booleans; `null` and
/// empty strings both arrive for blank cells depending on the render option.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// Blank cell (JSON `null`)
    #[default]
    Empty,
    /// Text content, kept verbatim
    Text(String),
    /// Numeric content
    Number(f64),
    /// Boolean content
    Boolean(bool),
}

/// Equality predicate used when searching a grid for a label.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Matcher {
    /// Coercing comparison: numeric-looking text equals the number it spells.
    #[default]
    Loose,
    /// Text equals text only, byte for byte.
    Exact,
}

impl Matcher {
    /// Parses a matcher name (`loose` or `exact`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "loose" | "weak" => Some(Self::Loose),
            "exact" | "strict" => Some(Self::Exact),
            _ => None,
        }
    }

    /// Returns true if `cell` matches the text `target` under this predicate.
    pub fn matches(&self, target: &str, cell: &CellValue) -> bool {
        match self {
            Matcher::Exact => matches!(cell, CellValue::Text(text) if text == target),
            Matcher::Loose => cell.loosely_equals(target),
        }
    }
}

impl CellValue {
    /// True for the cells that terminate a header run: blank or empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Compares the cell with a text target, coercing across types.
    ///
    /// Text compares verbatim. Numbers and booleans compare numerically
    /// against the target parsed as a number, where blank text counts as 0.
    /// A blank cell (`null`) equals no text at all, not even "".
    pub fn loosely_equals(&self, target: &str) -> bool {
        match self {
            CellValue::Text(text) => text == target,
            CellValue::Number(number) => to_number(target) == Some(*number),
            CellValue::Boolean(flag) => to_number(target) == Some(if *flag { 1.0 } else { 0.0 }),
            CellValue::Empty => false,
        }
    }
}

/// Parses text the way a numeric comparison would: surrounding whitespace is
/// ignored and blank text is zero.
///
/// Accepts decimal and exponent notation, `0x`/`0o`/`0b` integers and a signed
/// `Infinity`. Other spellings such as `inf` or `nan` are not numbers.
fn to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => (),
    }
    let radix = match trimmed.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => 10,
    };
    if radix != 10 {
        return parse_integer(&trimmed[2..], radix);
    }
    if trimmed.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn parse_integer(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits
        .chars()
        .try_fold(0.0, |value: f64, c| c.to_digit(radix).map(|digit| value * radix as f64 + digit as f64))
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(flag) => CellValue::Boolean(*flag),
            Value::Number(number) => number
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::Text(number.to_string())),
            Value::String(text) => CellValue::Text(text.to_owned()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_owned())
    }
}

impl From<f64> for CellValue {
    fn from(number: f64) -> Self {
        CellValue::Number(number)
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => write!(f, "{text}"),
            CellValue::Number(number) => write!(f, "{number}"),
            CellValue::Boolean(flag) => write!(f, "{}", if *flag { "TRUE" } else { "FALSE" }),
        }
    }
}
