use crate::dose::types::SyringeSize;
use serde::Serialize;

/// Rendered width of a full barrel, identical for every syringe profile
pub const FULL_SCALE_EXTENT: f64 = 360.0;

/// Clamp a reading onto the barrel's 0..=capacity scale. NaN draws as empty.
pub fn clamp_reading(reading: f64, syringe: SyringeSize) -> f64 {
    if reading.is_nan() {
        return 0.0;
    }
    reading.clamp(0.0, syringe.capacity())
}

/// Width of the liquid column for `reading` on `syringe`
pub fn map_to_fill_extent(reading: f64, syringe: SyringeSize) -> f64 {
    clamp_reading(reading, syringe) * syringe.pixels_per_unit()
}

/// What the syringe illustration needs to draw its fill
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillIndicator {
    pub safe_units: f64,
    pub extent: f64,
    /// Reading is past the last mark; the text still shows the real value
    pub overflow: bool,
}

impl FillIndicator {
    pub fn new(reading: f64, syringe: SyringeSize) -> Self {
        let safe_units = clamp_reading(reading, syringe);
        Self {
            safe_units,
            extent: safe_units * syringe.pixels_per_unit(),
            overflow: reading > syringe.capacity(),
        }
    }

    /// Filled share of the barrel, 0.0..=1.0
    pub fn ratio(&self) -> f64 {
        self.extent / FULL_SCALE_EXTENT
    }
}
