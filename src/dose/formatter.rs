use crate::dose::types::CalculationResult;
use serde::Serialize;

/// Display strings for one calculation, rounded at the boundary only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedResult {
    pub concentration: String,
    pub volume_per_dose: String,
    pub syringe_reading: String,
}

impl FormattedResult {
    pub fn new(result: &CalculationResult) -> Self {
        Self {
            concentration: format_concentration(result.concentration),
            volume_per_dose: format_volume(result.volume_per_dose),
            syringe_reading: format_reading(result.syringe_reading),
        }
    }

    /// One-line reading, e.g. "10.0 units (0.100 mL)"
    pub fn summary(&self) -> String {
        format!("{} units ({} mL)", self.syringe_reading, self.volume_per_dose)
    }
}

pub fn format_concentration(mg_per_ml: f64) -> String {
    format!("{:.2}", mg_per_ml)
}

pub fn format_volume(ml: f64) -> String {
    format!("{:.3}", ml)
}

pub fn format_reading(units: f64) -> String {
    format!("{:.1}", units)
}

/// Shortest decimal form with at most six fraction digits: 0.25, 250, 1.5
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.6}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Button-style label: amount immediately followed by its unit ("250mcg")
pub fn format_labeled(value: f64, unit: &str) -> String {
    format!("{}{}", format_amount(value), unit)
}
