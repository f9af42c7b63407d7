use crate::dose::error::DoseError;
use crate::dose::types::{DoseUnit, SyringeSize};
use crate::input::state::{
    CalculatorState, DEFAULT_DOSE_MG, DEFAULT_STRENGTH_MG, DEFAULT_VOLUME_ML,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(#[from] DoseError),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Starting values for a fresh calculator
    #[serde(default)]
    pub defaults: DefaultsConfig,

    // Advisory thresholds
    #[serde(default)]
    pub warnings: WarningsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DefaultsConfig {
    /// Starting dose, expressed in `dose_unit`
    #[serde(default = "default_dose")]
    pub dose: f64,
    #[serde(default)]
    pub dose_unit: DoseUnit,
    #[serde(default = "default_strength")]
    pub strength: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub syringe: SyringeSize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            dose: default_dose(),
            dose_unit: DoseUnit::default(),
            strength: default_strength(),
            volume: default_volume(),
            syringe: SyringeSize::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WarningsConfig {
    /// Readings under this many units get a precision warning
    #[serde(default = "default_low_reading_units")]
    pub low_reading_units: f64,
}

impl Default for WarningsConfig {
    fn default() -> Self {
        Self {
            low_reading_units: default_low_reading_units(),
        }
    }
}

fn default_dose() -> f64 {
    DEFAULT_DOSE_MG
}

fn default_strength() -> f64 {
    DEFAULT_STRENGTH_MG
}

fn default_volume() -> f64 {
    DEFAULT_VOLUME_ML
}

fn default_low_reading_units() -> f64 {
    1.0
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    /// Parse and validate; defaults must be usable as calculator inputs
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.initial_state()?;
        Ok(config)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Fresh calculator state seeded from `[defaults]`
    pub fn initial_state(&self) -> Result<CalculatorState, DoseError> {
        let d = &self.defaults;
        CalculatorState::new(
            d.dose_unit.to_mg(d.dose),
            d.dose_unit,
            d.strength,
            d.volume,
            d.syringe,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_matches_default_state() {
        let state = Config::empty().initial_state().unwrap();
        assert_eq!(state, CalculatorState::default());
        assert_eq!(Config::empty().warnings.low_reading_units, 1.0);
    }

    #[test]
    fn test_load_partial_config() {
        let config = Config::load_from_str(
            r#"
[defaults]
dose = 500
dose_unit = "mcg"
syringe = 50

[warnings]
low_reading_units = 2.5
"#,
        )
        .unwrap();

        assert_eq!(config.defaults.strength, DEFAULT_STRENGTH_MG);
        assert_eq!(config.warnings.low_reading_units, 2.5);

        let state = config.initial_state().unwrap();
        assert_eq!(state.dose.value(), 0.5);
        assert_eq!(state.dose_unit, DoseUnit::Mcg);
        assert_eq!(state.syringe, SyringeSize::Units50);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::load_from_str("[defaults]\nvolume = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::load_from_str("[defaults]\nsyringe = 40"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::load_from_str("[defaults]\ndose_unit = \"grams\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load_from_file("/nonexistent/reconstitute.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
