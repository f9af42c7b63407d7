use crate::dose::error::DoseError;
use crate::dose::formatter::{format_amount, format_reading};
use crate::dose::types::{CalculationResult, Quantity, SyringeSize};
use crate::input::quantity::QuantitySlot;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Something the user entered is being ignored
    Error,
    /// The inputs work but the dose is awkward to draw
    Warning,
}

impl IssueSeverity {
    fn heading(self) -> &'static str {
        match self {
            IssueSeverity::Error => "Errors",
            IssueSeverity::Warning => "Warnings",
        }
    }
}

/// One advisory, optionally tied to the input it is about
#[derive(Debug, Clone, Serialize)]
pub struct Advisory {
    pub severity: IssueSeverity,
    pub quantity: Option<Quantity>,
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quantity {
            Some(quantity) => write!(f, "[{}] {}", quantity, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Non-fatal findings about the current inputs, in the order they were
/// raised. Nothing here stops a calculation; the caller decides how loudly
/// to show them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    advisories: Vec<Advisory>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, severity: IssueSeverity, quantity: Option<Quantity>, message: String) {
        self.advisories.push(Advisory {
            severity,
            quantity,
            message,
        });
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn with_severity(&self, severity: IssueSeverity) -> impl Iterator<Item = &Advisory> {
        self.advisories.iter().filter(move |a| a.severity == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Advisory> {
        self.with_severity(IssueSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Advisory> {
        self.with_severity(IssueSeverity::Warning)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn has_issues(&self) -> bool {
        !self.advisories.is_empty()
    }
}

/// Grouped by severity, errors first:
///
/// ```text
/// Errors:
///   [diluent volume] 'abc' is not a positive number; still using 2 mL
/// Warnings:
///   [dose] Dose is only 0.8 units; ...
/// ```
impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for severity in [IssueSeverity::Error, IssueSeverity::Warning] {
            let mut group = self.with_severity(severity).peekable();
            if group.peek().is_none() {
                continue;
            }
            writeln!(f, "{}:", severity.heading())?;
            for advisory in group {
                writeln!(f, "  {}", advisory)?;
            }
        }
        Ok(())
    }
}

/// Flag custom text that is not driving its slot, given the reason it was
/// turned away
pub fn check_custom_text(
    slot: &QuantitySlot,
    reason: &DoseError,
    validation: &mut ValidationResult,
) {
    let problem = match reason {
        DoseError::NonFiniteResult => "is out of range for the other inputs",
        _ => "is not a positive number",
    };
    validation.raise(
        IssueSeverity::Error,
        Some(slot.quantity),
        format!(
            "'{}' {}; still using {} {}",
            slot.custom_text(),
            problem,
            format_amount(slot.value()),
            slot.quantity.canonical_unit()
        ),
    );
}

/// Flag readings the chosen syringe cannot measure well
pub fn check_reading(
    result: &CalculationResult,
    syringe: SyringeSize,
    low_reading_units: f64,
    validation: &mut ValidationResult,
) {
    if result.exceeds(syringe) {
        validation.raise(
            IssueSeverity::Warning,
            Some(Quantity::Dose),
            format!(
                "Dose needs {} units but the syringe holds {}; it will not fit in one draw",
                format_reading(result.syringe_reading),
                syringe.capacity_units()
            ),
        );
    } else if result.syringe_reading < low_reading_units {
        validation.raise(
            IssueSeverity::Warning,
            Some(Quantity::Dose),
            format!(
                "Dose is only {} units; readings below {} units are hard to measure accurately",
                format_reading(result.syringe_reading),
                format_amount(low_reading_units)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dose::arithmetic::compute_result;
    use crate::input::quantity::{reconcile, InputEvent};

    #[test]
    fn test_reading_over_capacity_warns() {
        let result = compute_result(5.0, 10.0, 3.0, SyringeSize::Units30);
        let mut validation = ValidationResult::new();
        check_reading(&result, SyringeSize::Units30, 1.0, &mut validation);
        assert!(validation.is_valid());
        assert_eq!(validation.warnings().count(), 1);
        assert!(validation.advisories()[0].message.contains("45.0 units"));
    }

    #[test]
    fn test_tiny_reading_warns() {
        let result = compute_result(0.25, 30.0, 1.0, SyringeSize::Units100);
        let mut validation = ValidationResult::new();
        check_reading(&result, SyringeSize::Units100, 1.0, &mut validation);
        assert_eq!(validation.warnings().count(), 1);
        assert!(validation.advisories()[0].message.contains("0.8 units"));
    }

    #[test]
    fn test_comfortable_reading_is_clean() {
        let result = compute_result(0.25, 10.0, 4.0, SyringeSize::Units100);
        let mut validation = ValidationResult::new();
        check_reading(&result, SyringeSize::Units100, 1.0, &mut validation);
        assert!(!validation.has_issues());
        assert_eq!(validation.to_string(), "");
    }

    #[test]
    fn test_invalid_custom_text_reported() {
        let slot = QuantitySlot::new(Quantity::Volume, 2.0);
        let slot = reconcile(&slot, &InputEvent::CustomTextChanged("abc".into()), None);
        let reason = slot.custom_candidate(None).unwrap().unwrap_err();
        let mut validation = ValidationResult::new();
        check_custom_text(&slot, &reason, &mut validation);
        assert!(!validation.is_valid());
        assert_eq!(
            validation.errors().next().unwrap().quantity,
            Some(Quantity::Volume)
        );

        let rendered = validation.to_string();
        assert!(rendered.contains("[diluent volume] 'abc' is not a positive number; still using 2 mL"));
    }

    #[test]
    fn test_report_groups_errors_before_warnings() {
        let mut validation = ValidationResult::new();
        validation.raise(IssueSeverity::Warning, None, "thin".to_string());
        validation.raise(
            IssueSeverity::Error,
            Some(Quantity::Strength),
            "'1e-320' is out of range for the other inputs; still using 10 mg".to_string(),
        );

        assert_eq!(
            validation.to_string(),
            "Errors:\n  \
             [vial strength] '1e-320' is out of range for the other inputs; still using 10 mg\n\
             Warnings:\n  thin\n"
        );
    }
}
