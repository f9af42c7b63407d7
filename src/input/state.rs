use crate::dose::arithmetic::{compute_result, ensure_positive, try_compute_result};
use crate::dose::error::DoseError;
use crate::dose::fill::FillIndicator;
use crate::dose::formatter::FormattedResult;
use crate::dose::types::{CalculationResult, DoseUnit, Quantity, SyringeSize};
use crate::input::presets::{preset_buttons, PresetButton};
use crate::input::quantity::{InputEvent, QuantitySlot, SlotSource};
use crate::input::validation::{check_custom_text, check_reading, ValidationResult};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOSE_MG: f64 = 0.25;
pub const DEFAULT_STRENGTH_MG: f64 = 10.0;
pub const DEFAULT_VOLUME_ML: f64 = 2.0;

/// Discrete user action against the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Input { quantity: Quantity, event: InputEvent },
    SetDoseUnit { unit: DoseUnit },
    SetSyringe { syringe: SyringeSize },
}

/// The whole calculator: three input slots plus the dose lens and syringe.
/// Owned by the presentation layer; every action is followed by a full
/// re-derivation through [`CalculatorState::snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StateRecord")]
pub struct CalculatorState {
    pub dose: QuantitySlot,
    pub strength: QuantitySlot,
    pub volume: QuantitySlot,
    pub dose_unit: DoseUnit,
    pub syringe: SyringeSize,
}

#[derive(Deserialize)]
struct StateRecord {
    dose: QuantitySlot,
    strength: QuantitySlot,
    volume: QuantitySlot,
    #[serde(default)]
    dose_unit: DoseUnit,
    #[serde(default)]
    syringe: SyringeSize,
}

impl TryFrom<StateRecord> for CalculatorState {
    type Error = DoseError;

    fn try_from(record: StateRecord) -> Result<Self, Self::Error> {
        let state = Self {
            dose: record.dose,
            strength: record.strength,
            volume: record.volume,
            dose_unit: record.dose_unit,
            syringe: record.syringe,
        };
        state.admits(Quantity::Dose, state.dose.value())?;
        Ok(state)
    }
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            dose: QuantitySlot::new(Quantity::Dose, DEFAULT_DOSE_MG),
            strength: QuantitySlot::new(Quantity::Strength, DEFAULT_STRENGTH_MG),
            volume: QuantitySlot::new(Quantity::Volume, DEFAULT_VOLUME_ML),
            dose_unit: DoseUnit::default(),
            syringe: SyringeSize::default(),
        }
    }
}

impl CalculatorState {
    /// Build a state from canonical starting values (dose in mg)
    pub fn new(
        dose_mg: f64,
        dose_unit: DoseUnit,
        strength_mg: f64,
        volume_ml: f64,
        syringe: SyringeSize,
    ) -> Result<Self, DoseError> {
        let state = Self {
            dose: QuantitySlot::new(Quantity::Dose, ensure_positive(Quantity::Dose, dose_mg)?),
            strength: QuantitySlot::new(
                Quantity::Strength,
                ensure_positive(Quantity::Strength, strength_mg)?,
            ),
            volume: QuantitySlot::new(
                Quantity::Volume,
                ensure_positive(Quantity::Volume, volume_ml)?,
            ),
            dose_unit,
            syringe,
        };
        state.admits(Quantity::Dose, dose_mg)?;
        Ok(state)
    }

    pub fn slot(&self, quantity: Quantity) -> &QuantitySlot {
        match quantity {
            Quantity::Dose => &self.dose,
            Quantity::Strength => &self.strength,
            Quantity::Volume => &self.volume,
        }
    }

    fn slot_mut(&mut self, quantity: Quantity) -> &mut QuantitySlot {
        match quantity {
            Quantity::Dose => &mut self.dose,
            Quantity::Strength => &mut self.strength,
            Quantity::Volume => &mut self.volume,
        }
    }

    /// Unit lens applied to entries for `quantity`
    pub fn lens(&self, quantity: Quantity) -> Option<DoseUnit> {
        (quantity == Quantity::Dose).then_some(self.dose_unit)
    }

    pub fn apply(&mut self, action: Action) {
        debug!("Applying {:?}", action);
        match action {
            Action::Input { quantity, event } => {
                let lens = self.lens(quantity);
                let current = self.clone();
                self.slot_mut(quantity).apply_checked(&event, lens, |value| {
                    current.admits(quantity, value).map(|_| ())
                });
            }
            // The canonical dose stays in mg; only the lens changes
            Action::SetDoseUnit { unit } => self.dose_unit = unit,
            Action::SetSyringe { syringe } => self.syringe = syringe,
        }
    }

    /// Current dose in the selected display unit
    pub fn display_dose(&self) -> f64 {
        self.dose.display_value(Some(self.dose_unit))
    }

    /// Check that `quantity` may take `value` alongside the other two
    /// slots. The result must be finite on every syringe size, so a later
    /// syringe change cannot overflow the reading.
    pub fn admits(&self, quantity: Quantity, value: f64) -> Result<CalculationResult, DoseError> {
        let value_of = |q: Quantity| {
            if q == quantity {
                value
            } else {
                self.slot(q).value()
            }
        };
        let dose_mg = value_of(Quantity::Dose);
        let strength_mg = value_of(Quantity::Strength);
        let volume_ml = value_of(Quantity::Volume);

        for syringe in SyringeSize::ALL {
            try_compute_result(dose_mg, strength_mg, volume_ml, syringe)?;
        }
        try_compute_result(dose_mg, strength_mg, volume_ml, self.syringe)
    }

    /// Why the custom text of `quantity` is not driving its value, if it is not
    pub fn ignored_custom_text(&self, quantity: Quantity) -> Option<DoseError> {
        let candidate = self.slot(quantity).custom_candidate(self.lens(quantity))?;
        candidate
            .and_then(|value| self.admits(quantity, value))
            .err()
    }

    pub fn result(&self) -> CalculationResult {
        compute_result(
            self.dose.value(),
            self.strength.value(),
            self.volume.value(),
            self.syringe,
        )
    }

    pub fn fill(&self) -> FillIndicator {
        FillIndicator::new(self.result().syringe_reading, self.syringe)
    }

    pub fn validate(&self, low_reading_units: f64) -> ValidationResult {
        let mut validation = ValidationResult::new();
        for quantity in Quantity::ALL {
            if let Some(reason) = self.ignored_custom_text(quantity) {
                check_custom_text(self.slot(quantity), &reason, &mut validation);
            }
        }
        check_reading(&self.result(), self.syringe, low_reading_units, &mut validation);
        validation
    }

    /// Everything a renderer needs after one transition
    pub fn snapshot(&self, low_reading_units: f64) -> Snapshot {
        let result = self.result();
        Snapshot {
            display_dose: self.display_dose(),
            dose_unit: self.dose_unit,
            syringe: self.syringe,
            formatted: FormattedResult::new(&result),
            result,
            fill: FillIndicator::new(result.syringe_reading, self.syringe),
            validation: self.validate(low_reading_units),
            slots: Quantity::ALL
                .iter()
                .map(|&q| SlotView {
                    quantity: q,
                    custom_text: self.slot(q).custom_text().to_string(),
                    custom_active: self.slot(q).source() == SlotSource::Custom,
                    buttons: preset_buttons(self.slot(q), self.dose_unit),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub quantity: Quantity,
    pub custom_text: String,
    pub custom_active: bool,
    pub buttons: Vec<PresetButton>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub display_dose: f64,
    pub dose_unit: DoseUnit,
    pub syringe: SyringeSize,
    pub result: CalculationResult,
    pub formatted: FormattedResult,
    pub fill: FillIndicator,
    pub validation: ValidationResult,
    pub slots: Vec<SlotView>,
}
