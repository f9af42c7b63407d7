use crate::dose::arithmetic::ensure_positive;
use crate::dose::error::DoseError;
use crate::dose::types::{DoseUnit, Quantity};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Longest numeric prefix of a string, browser-style: optional sign,
    /// digits with an optional fraction, optional exponent.
    /// Examples: "2", "0.25", ".5", "1e3", "12abc" (prefix "12")
    static ref LEADING_NUMBER: Regex = Regex::new(
        r"^\s*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)"
    ).unwrap();

    /// A whole amount: number, optional whitespace, optional unit.
    /// Examples: "250mcg", "0.25 mg", "1.5", "2 mL"
    static ref AMOUNT_EXPRESSION: Regex = Regex::new(
        r"^\s*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)\s*([a-zA-Zµμ]+)?\s*$"
    ).unwrap();
}

/// Read the numeric prefix of `text`, ignoring anything after it.
/// Returns `None` when there is no numeric prefix at all.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse custom-field text into a value usable for calculations
pub fn parse_positive(quantity: Quantity, text: &str) -> Result<f64, DoseError> {
    let value = parse_leading_number(text).ok_or_else(|| DoseError::NotANumber {
        quantity,
        text: text.to_string(),
    })?;
    ensure_positive(quantity, value)
}

/// Split a whole amount into its positive value and optional unit text.
/// Unlike custom-field parsing, trailing text other than a unit is an error.
fn parse_amount<'a>(
    quantity: Quantity,
    text: &'a str,
) -> Result<(f64, Option<&'a str>), DoseError> {
    let not_a_number = || DoseError::NotANumber {
        quantity,
        text: text.to_string(),
    };
    let caps = AMOUNT_EXPRESSION.captures(text).ok_or_else(not_a_number)?;

    let value = caps
        .get(1)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(not_a_number)?;
    let value = ensure_positive(quantity, value)?;

    Ok((value, caps.get(2).map(|m| m.as_str())))
}

/// Parse a dose like "250mcg" or "0.25 mg". The unit is `None` when the
/// expression is a bare number.
pub fn parse_dose_expression(text: &str) -> Result<(f64, Option<DoseUnit>), DoseError> {
    let (value, unit) = parse_amount(Quantity::Dose, text)?;
    let unit = match unit {
        Some(unit) => Some(unit.parse::<DoseUnit>()?),
        None => None,
    };
    Ok((value, unit))
}

/// Parse a strength or volume like "10", "10mg" or "2 mL". The only unit
/// accepted is the quantity's canonical one, in any case.
pub fn parse_measure(quantity: Quantity, text: &str) -> Result<f64, DoseError> {
    let (value, unit) = parse_amount(quantity, text)?;
    match unit {
        Some(unit) if !unit.eq_ignore_ascii_case(quantity.canonical_unit()) => {
            Err(DoseError::UnknownUnit(unit.to_string()))
        }
        _ => Ok(value),
    }
}
