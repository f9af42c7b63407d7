// Dose arithmetic, unit handling and syringe fill mapping.
// Everything here is a pure function of its inputs.

pub mod arithmetic;
pub mod error;
pub mod fill;
pub mod formatter;
pub mod parser;
pub mod types;

pub use arithmetic::{
    compute_result, concentration, ensure_positive, solve_optimal_volume,
    solve_volume_for_target_reading, solve_volume_for_target_volume, try_compute_result,
    OPTIMIZER_TARGET_VOLUME_ML,
};
pub use error::DoseError;
pub use fill::{clamp_reading, map_to_fill_extent, FillIndicator, FULL_SCALE_EXTENT};
pub use formatter::{format_amount, format_labeled, FormattedResult};
pub use parser::{parse_dose_expression, parse_leading_number, parse_measure, parse_positive};
pub use types::{CalculationResult, DoseUnit, Quantity, SyringeSize};
