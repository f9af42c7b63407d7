use crate::dose::error::DoseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three user-controlled inputs of the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Dose,
    Strength,
    Volume,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Dose, Quantity::Strength, Quantity::Volume];

    /// Unit the canonical value of this quantity is stored in
    pub fn canonical_unit(self) -> &'static str {
        match self {
            Quantity::Dose | Quantity::Strength => "mg",
            Quantity::Volume => "mL",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Dose => write!(f, "dose"),
            Quantity::Strength => write!(f, "vial strength"),
            Quantity::Volume => write!(f, "diluent volume"),
        }
    }
}

impl FromStr for Quantity {
    type Err = DoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dose" => Ok(Quantity::Dose),
            "strength" => Ok(Quantity::Strength),
            "volume" | "water" | "diluent" => Ok(Quantity::Volume),
            _ => Err(DoseError::UnknownQuantity(s.to_string())),
        }
    }
}

/// Display unit for the dose. The canonical dose is always milligrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseUnit {
    #[default]
    Mg,
    Mcg,
}

impl DoseUnit {
    pub const MCG_PER_MG: f64 = 1000.0;

    /// Convert a value entered in this unit to milligrams
    pub fn to_mg(self, value: f64) -> f64 {
        match self {
            DoseUnit::Mg => value,
            DoseUnit::Mcg => value / Self::MCG_PER_MG,
        }
    }

    /// Express a milligram value in this unit
    pub fn from_mg(self, mg: f64) -> f64 {
        match self {
            DoseUnit::Mg => mg,
            DoseUnit::Mcg => mg * Self::MCG_PER_MG,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DoseUnit::Mg => "mg",
            DoseUnit::Mcg => "mcg",
        }
    }
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DoseUnit {
    type Err = DoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mg" => Ok(DoseUnit::Mg),
            "mcg" | "ug" | "µg" | "μg" => Ok(DoseUnit::Mcg),
            _ => Err(DoseError::UnknownUnit(s.to_string())),
        }
    }
}

/// Insulin-style syringe profile. Every profile's full barrel renders at the
/// same width, so pixels per unit shrink as capacity grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SyringeSize {
    Units30,
    Units50,
    #[default]
    Units100,
}

impl SyringeSize {
    pub const ALL: [SyringeSize; 3] = [
        SyringeSize::Units30,
        SyringeSize::Units50,
        SyringeSize::Units100,
    ];

    pub fn capacity_units(self) -> u32 {
        match self {
            SyringeSize::Units30 => 30,
            SyringeSize::Units50 => 50,
            SyringeSize::Units100 => 100,
        }
    }

    pub fn capacity(self) -> f64 {
        f64::from(self.capacity_units())
    }

    pub fn pixels_per_unit(self) -> f64 {
        match self {
            SyringeSize::Units30 => 12.0,
            SyringeSize::Units50 => 7.2,
            SyringeSize::Units100 => 3.6,
        }
    }
}

impl TryFrom<u32> for SyringeSize {
    type Error = DoseError;

    fn try_from(units: u32) -> Result<Self, Self::Error> {
        match units {
            30 => Ok(SyringeSize::Units30),
            50 => Ok(SyringeSize::Units50),
            100 => Ok(SyringeSize::Units100),
            other => Err(DoseError::UnsupportedSyringe(other)),
        }
    }
}

impl From<SyringeSize> for u32 {
    fn from(size: SyringeSize) -> Self {
        size.capacity_units()
    }
}

impl fmt::Display for SyringeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units", self.capacity_units())
    }
}

/// Derived outputs of one calculation. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationResult {
    /// mg/mL after reconstitution
    pub concentration: f64,
    /// mL drawn per dose
    pub volume_per_dose: f64,
    /// Unit marks on the selected syringe, unclamped
    pub syringe_reading: f64,
}

impl CalculationResult {
    /// True when the dose does not fit in one draw of the syringe
    pub fn exceeds(&self, syringe: SyringeSize) -> bool {
        self.syringe_reading > syringe.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dose_unit_conversion() {
        assert_eq!(DoseUnit::Mcg.to_mg(250.0), 0.25);
        assert_eq!(DoseUnit::Mcg.from_mg(0.25), 250.0);
        assert_eq!(DoseUnit::Mg.to_mg(1.5), 1.5);
        assert_eq!(DoseUnit::Mg.from_mg(1.5), 1.5);
    }

    #[test]
    fn test_dose_unit_parse() {
        assert_eq!("mg".parse::<DoseUnit>().unwrap(), DoseUnit::Mg);
        assert_eq!("MCG".parse::<DoseUnit>().unwrap(), DoseUnit::Mcg);
        assert_eq!("µg".parse::<DoseUnit>().unwrap(), DoseUnit::Mcg);
        assert!(matches!(
            "grams".parse::<DoseUnit>(),
            Err(DoseError::UnknownUnit(u)) if u == "grams"
        ));
    }

    #[test]
    fn test_quantity_parse() {
        assert_eq!("dose".parse::<Quantity>().unwrap(), Quantity::Dose);
        assert_eq!("Water".parse::<Quantity>().unwrap(), Quantity::Volume);
        assert!("syringe".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_syringe_from_units() {
        assert_eq!(SyringeSize::try_from(30).unwrap(), SyringeSize::Units30);
        assert_eq!(SyringeSize::try_from(100).unwrap(), SyringeSize::Units100);
        assert_eq!(
            SyringeSize::try_from(40),
            Err(DoseError::UnsupportedSyringe(40))
        );
    }

    #[test]
    fn test_fixed_visual_scale() {
        let widths: Vec<f64> = SyringeSize::ALL
            .iter()
            .map(|s| s.capacity() * s.pixels_per_unit())
            .collect();
        for w in &widths {
            assert!((w - widths[0]).abs() < 1e-9, "widths differ: {:?}", widths);
        }
    }

    #[test]
    fn test_syringe_serde_as_integer() {
        let json = serde_json::to_string(&SyringeSize::Units50).unwrap();
        assert_eq!(json, "50");
        let back: SyringeSize = serde_json::from_str("30").unwrap();
        assert_eq!(back, SyringeSize::Units30);
        assert!(serde_json::from_str::<SyringeSize>("75").is_err());
    }

    proptest! {
        #[test]
        fn mg_mcg_round_trip(x in 1e-6f64..1e6) {
            let back = DoseUnit::Mcg.to_mg(DoseUnit::Mcg.from_mg(x));
            prop_assert!((back - x).abs() <= 1e-9 * x.max(1.0));
        }
    }
}
