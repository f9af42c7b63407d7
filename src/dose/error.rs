use crate::dose::types::Quantity;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DoseError {
    #[error("Invalid {quantity}: {value} (must be a positive number)")]
    NonPositive { quantity: Quantity, value: f64 },
    #[error("Invalid {quantity}: '{text}' is not a number")]
    NotANumber { quantity: Quantity, text: String },
    #[error("Unsupported syringe size: {0} units (expected 30, 50 or 100)")]
    UnsupportedSyringe(u32),
    #[error("Unknown dose unit: {0}")]
    UnknownUnit(String),
    #[error("Unknown quantity: {0}")]
    UnknownQuantity(String),
    #[error("Result is out of range for these inputs")]
    NonFiniteResult,
}
