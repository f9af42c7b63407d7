// Curated one-tap values. The mg and mcg dose lists are chosen separately
// because the common round numbers differ between the two framings.

use crate::dose::formatter::format_labeled;
use crate::dose::types::{DoseUnit, Quantity};
use crate::input::quantity::QuantitySlot;
use serde::Serialize;

pub const DOSE_PRESETS_MG: &[f64] = &[0.25, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 5.0];
pub const DOSE_PRESETS_MCG: &[f64] = &[100.0, 250.0, 500.0, 750.0, 1000.0, 2000.0, 3000.0, 5000.0];
pub const STRENGTH_PRESETS_MG: &[f64] = &[2.0, 5.0, 10.0, 15.0, 20.0, 30.0];
pub const VOLUME_PRESETS_ML: &[f64] = &[1.0, 2.0, 3.0, 4.0, 5.0, 10.0];

pub fn dose_presets(unit: DoseUnit) -> &'static [f64] {
    match unit {
        DoseUnit::Mg => DOSE_PRESETS_MG,
        DoseUnit::Mcg => DOSE_PRESETS_MCG,
    }
}

/// Preset list shown for `quantity`; `dose_unit` only matters for the dose
pub fn presets_for(quantity: Quantity, dose_unit: DoseUnit) -> &'static [f64] {
    match quantity {
        Quantity::Dose => dose_presets(dose_unit),
        Quantity::Strength => STRENGTH_PRESETS_MG,
        Quantity::Volume => VOLUME_PRESETS_ML,
    }
}

/// Unit label printed on the buttons and beside the custom field
pub fn display_unit_label(quantity: Quantity, dose_unit: DoseUnit) -> &'static str {
    match quantity {
        Quantity::Dose => dose_unit.label(),
        other => other.canonical_unit(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetButton {
    pub value: f64,
    pub label: String,
    pub selected: bool,
}

/// Button rows for one slot, with the highlight rule applied
pub fn preset_buttons(slot: &QuantitySlot, dose_unit: DoseUnit) -> Vec<PresetButton> {
    let lens = (slot.quantity == Quantity::Dose).then_some(dose_unit);
    let unit = display_unit_label(slot.quantity, dose_unit);

    presets_for(slot.quantity, dose_unit)
        .iter()
        .map(|&value| PresetButton {
            value,
            label: format_labeled(value, unit),
            selected: slot.is_preset_selected(value, lens),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::quantity::{reconcile, InputEvent};

    #[test]
    fn test_lists_are_independent_per_unit() {
        assert_eq!(dose_presets(DoseUnit::Mg)[0], 0.25);
        assert_eq!(dose_presets(DoseUnit::Mcg)[0], 100.0);
        // 100 mcg has no mg counterpart in the curated list
        assert!(!DOSE_PRESETS_MG.contains(&0.1));
    }

    #[test]
    fn test_non_dose_lists_ignore_unit() {
        assert_eq!(
            presets_for(Quantity::Strength, DoseUnit::Mcg),
            STRENGTH_PRESETS_MG
        );
        assert_eq!(presets_for(Quantity::Volume, DoseUnit::Mg), VOLUME_PRESETS_ML);
    }

    #[test]
    fn test_button_labels_and_selection() {
        let slot = QuantitySlot::new(Quantity::Dose, 0.25);

        let buttons = preset_buttons(&slot, DoseUnit::Mg);
        assert_eq!(buttons[0].label, "0.25mg");
        assert!(buttons[0].selected);
        assert_eq!(buttons.iter().filter(|b| b.selected).count(), 1);

        // Same canonical dose seen through the mcg lens lights 250mcg
        let buttons = preset_buttons(&slot, DoseUnit::Mcg);
        let lit: Vec<_> = buttons.iter().filter(|b| b.selected).collect();
        assert_eq!(lit.len(), 1);
        assert_eq!(lit[0].label, "250mcg");
    }

    #[test]
    fn test_no_button_lit_under_custom() {
        let slot = QuantitySlot::new(Quantity::Volume, 2.0);
        let slot = reconcile(&slot, &InputEvent::CustomFieldFocused, None);
        let buttons = preset_buttons(&slot, DoseUnit::Mg);
        assert!(buttons.iter().all(|b| !b.selected));
        assert_eq!(buttons[1].label, "2mL");
    }
}
