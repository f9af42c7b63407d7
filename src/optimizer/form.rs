use crate::dose::arithmetic::{solve_optimal_volume, OPTIMIZER_TARGET_VOLUME_ML};
use crate::dose::error::DoseError;
use crate::dose::formatter::format_amount;
use crate::dose::parser::parse_positive;
use crate::dose::types::Quantity;
use log::debug;
use serde::Serialize;

pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid positive numbers.";

/// State of the "how much diluent to add" helper. It has its own fields
/// and ignores whatever the main calculator currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptimizerForm {
    /// Dose in mg, as typed
    pub dose_text: String,
    /// Vial strength in mg, as typed
    pub strength_text: String,
    result: Option<f64>,
    error: Option<String>,
}

impl OptimizerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Solve for the diluent volume. A failure clears any earlier result.
    pub fn calculate(&mut self) -> Result<f64, DoseError> {
        match self.solve() {
            Ok(volume) => {
                self.result = Some(volume);
                self.error = None;
                Ok(volume)
            }
            Err(e) => {
                debug!("Optimizer rejected input: {}", e);
                self.result = None;
                self.error = Some(INVALID_INPUT_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    fn solve(&self) -> Result<f64, DoseError> {
        let dose_mg = parse_positive(Quantity::Dose, &self.dose_text)?;
        let strength_mg = parse_positive(Quantity::Strength, &self.strength_text)?;
        solve_optimal_volume(dose_mg, strength_mg)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clear both fields and any result, leaving `notice` as the form's message
    pub fn clear_with_notice(&mut self, notice: impl Into<String>) {
        self.reset();
        self.error = Some(notice.into());
    }

    /// Result lines for display, `None` until a calculation succeeds
    pub fn summary(&self) -> Option<String> {
        self.result.map(|volume| {
            format!(
                "Add {:.2} mL of diluent.\nYour dose of {}mg will then be exactly {} units ({} mL).",
                volume,
                self.dose_text.trim(),
                format_amount(OPTIMIZER_TARGET_VOLUME_ML * 100.0),
                format_amount(OPTIMIZER_TARGET_VOLUME_ML)
            )
        })
    }
}
