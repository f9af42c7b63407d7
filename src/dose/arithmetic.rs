use crate::dose::error::DoseError;
use crate::dose::types::{CalculationResult, Quantity, SyringeSize};

/// Volume per dose the optimizer aims for: 10 units on a 100-unit syringe
pub const OPTIMIZER_TARGET_VOLUME_ML: f64 = 0.1;

/// The unit scale of every syringe profile spans this many millilitres
const FULL_SCALE_VOLUME_ML: f64 = 1.0;

/// Reject anything that is not a finite number strictly above zero
pub fn ensure_positive(quantity: Quantity, value: f64) -> Result<f64, DoseError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DoseError::NonPositive { quantity, value })
    }
}

/// mg/mL once `strength_mg` is dissolved in `volume_ml`
pub fn concentration(strength_mg: f64, volume_ml: f64) -> f64 {
    strength_mg / volume_ml
}

/// Forward formula. Callers guarantee all inputs are positive; use
/// [`try_compute_result`] when they might not be.
pub fn compute_result(
    dose_mg: f64,
    strength_mg: f64,
    volume_ml: f64,
    syringe: SyringeSize,
) -> CalculationResult {
    debug_assert!(dose_mg > 0.0 && strength_mg > 0.0 && volume_ml > 0.0);

    let concentration = concentration(strength_mg, volume_ml);
    let volume_per_dose = dose_mg / concentration;
    let syringe_reading = volume_per_dose / FULL_SCALE_VOLUME_ML * syringe.capacity();

    CalculationResult {
        concentration,
        volume_per_dose,
        syringe_reading,
    }
}

/// Forward formula with the positivity preconditions checked up front, so
/// a zero volume or strength never turns into a non-finite result. Inputs
/// that are positive but so extreme that a result overflows or a divisor
/// underflows are rejected as well.
pub fn try_compute_result(
    dose_mg: f64,
    strength_mg: f64,
    volume_ml: f64,
    syringe: SyringeSize,
) -> Result<CalculationResult, DoseError> {
    let dose_mg = ensure_positive(Quantity::Dose, dose_mg)?;
    let strength_mg = ensure_positive(Quantity::Strength, strength_mg)?;
    let volume_ml = ensure_positive(Quantity::Volume, volume_ml)?;

    let result = compute_result(dose_mg, strength_mg, volume_ml, syringe);
    if result.concentration.is_finite()
        && result.volume_per_dose.is_finite()
        && result.syringe_reading.is_finite()
    {
        Ok(result)
    } else {
        Err(DoseError::NonFiniteResult)
    }
}

/// Diluent volume that makes one dose land on `target_units` of a syringe
/// whose full scale is `capacity_units`.
pub fn solve_volume_for_target_reading(
    dose_mg: f64,
    strength_mg: f64,
    target_units: f64,
    capacity_units: f64,
) -> Result<f64, DoseError> {
    let target_volume_ml = target_units / capacity_units * FULL_SCALE_VOLUME_ML;
    solve_volume_for_target_volume(dose_mg, strength_mg, target_volume_ml)
}

/// Diluent volume for which one dose occupies `target_volume_ml`
pub fn solve_volume_for_target_volume(
    dose_mg: f64,
    strength_mg: f64,
    target_volume_ml: f64,
) -> Result<f64, DoseError> {
    let dose_mg = ensure_positive(Quantity::Dose, dose_mg)?;
    let strength_mg = ensure_positive(Quantity::Strength, strength_mg)?;
    let target_volume_ml = ensure_positive(Quantity::Volume, target_volume_ml)?;
    Ok(target_volume_ml * strength_mg / dose_mg)
}

/// Diluent volume that puts one dose at exactly 0.1 mL
pub fn solve_optimal_volume(dose_mg: f64, strength_mg: f64) -> Result<f64, DoseError> {
    solve_volume_for_target_volume(dose_mg, strength_mg, OPTIMIZER_TARGET_VOLUME_ML)
}
