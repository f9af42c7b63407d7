#[cfg(test)]
mod tests {
    use super::super::presets::DOSE_PRESETS_MCG;
    use super::super::quantity::{InputEvent, SlotSource};
    use super::super::state::{Action, CalculatorState};
    use crate::dose::types::{DoseUnit, Quantity, SyringeSize};

    fn input(quantity: Quantity, event: InputEvent) -> Action {
        Action::Input { quantity, event }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_state() {
        let state = CalculatorState::default();
        let result = state.result();
        // 10 mg in 2 mL, 0.25 mg dose
        assert!(close(result.concentration, 5.0));
        assert!(close(result.volume_per_dose, 0.05));
        assert!(close(result.syringe_reading, 5.0));
        assert_eq!(state.display_dose(), 0.25);
    }

    #[test]
    fn test_worked_example_through_actions() {
        let mut state = CalculatorState::default();
        state.apply(input(Quantity::Volume, InputEvent::PresetSelected(4.0)));

        let snapshot = state.snapshot(1.0);
        assert_eq!(snapshot.formatted.concentration, "2.50");
        assert_eq!(snapshot.formatted.volume_per_dose, "0.100");
        assert_eq!(snapshot.formatted.syringe_reading, "10.0");
        assert!(close(snapshot.fill.extent, 36.0));
        assert!(!snapshot.validation.has_issues());
    }

    #[test]
    fn test_unit_toggle_keeps_canonical_dose() {
        let mut state = CalculatorState::default();
        let before = state.result();

        state.apply(Action::SetDoseUnit {
            unit: DoseUnit::Mcg,
        });
        assert_eq!(state.dose.value(), 0.25);
        assert_eq!(state.display_dose(), 250.0);
        assert_eq!(state.result(), before);

        state.apply(Action::SetDoseUnit { unit: DoseUnit::Mg });
        assert_eq!(state.dose.value(), 0.25);
    }

    #[test]
    fn test_mcg_entries_convert_on_the_way_in() {
        let mut state = CalculatorState::default();
        state.apply(Action::SetDoseUnit {
            unit: DoseUnit::Mcg,
        });
        state.apply(input(
            Quantity::Dose,
            InputEvent::PresetSelected(DOSE_PRESETS_MCG[3]),
        ));
        assert_eq!(state.dose.value(), 0.75);

        state.apply(input(
            Quantity::Dose,
            InputEvent::CustomTextChanged("1500".to_string()),
        ));
        assert_eq!(state.dose.value(), 1.5);
        assert_eq!(state.dose.source(), SlotSource::Custom);

        // Strength is never scaled by the dose lens
        state.apply(input(
            Quantity::Strength,
            InputEvent::CustomTextChanged("12".to_string()),
        ));
        assert_eq!(state.strength.value(), 12.0);
    }

    #[test]
    fn test_invalid_text_leaves_result_unchanged() {
        let mut state = CalculatorState::default();
        let before = state.result();

        state.apply(input(
            Quantity::Volume,
            InputEvent::CustomTextChanged("abc".to_string()),
        ));
        assert_eq!(state.result(), before);
        assert_eq!(state.volume.custom_text(), "abc");
        assert_eq!(state.volume.source(), SlotSource::Preset);

        let snapshot = state.snapshot(1.0);
        let errors: Vec<_> = snapshot.validation.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].quantity, Some(Quantity::Volume));
    }

    #[test]
    fn test_zero_volume_never_reaches_arithmetic() {
        let mut state = CalculatorState::default();
        state.apply(input(
            Quantity::Volume,
            InputEvent::CustomTextChanged("0".to_string()),
        ));
        assert_eq!(state.volume.value(), 2.0);
        assert!(state.result().concentration.is_finite());
    }

    #[test]
    fn test_subnormal_strength_is_turned_away() {
        let mut state = CalculatorState::default();
        let before = state.result();

        state.apply(input(
            Quantity::Strength,
            InputEvent::CustomTextChanged("1e-320".to_string()),
        ));
        assert_eq!(state.strength.value(), 10.0);
        assert_eq!(state.strength.source(), SlotSource::Preset);
        assert_eq!(state.strength.custom_text(), "1e-320");
        assert_eq!(state.result(), before);

        let snapshot = state.snapshot(1.0);
        assert_eq!(snapshot.formatted.volume_per_dose, "0.050");
        assert_eq!(snapshot.formatted.syringe_reading, "5.0");
        let errors: Vec<_> = snapshot.validation.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].quantity, Some(Quantity::Strength));
        assert!(errors[0].message.contains("out of range"));
    }

    #[test]
    fn test_subnormal_volume_is_turned_away() {
        let mut state = CalculatorState::default();
        state.apply(input(
            Quantity::Volume,
            InputEvent::CustomTextChanged("1e-310".to_string()),
        ));
        assert_eq!(state.volume.value(), 2.0);
        assert_eq!(state.volume.custom_text(), "1e-310");

        let snapshot = state.snapshot(1.0);
        assert_eq!(snapshot.formatted.concentration, "5.00");
        assert!(snapshot.result.concentration.is_finite());
        assert_eq!(
            snapshot.validation.errors().next().unwrap().quantity,
            Some(Quantity::Volume)
        );

        // A usable entry afterwards takes over and clears the advisory
        state.apply(input(
            Quantity::Volume,
            InputEvent::CustomTextChanged("4".to_string()),
        ));
        assert_eq!(state.volume.value(), 4.0);
        assert!(state.snapshot(1.0).validation.is_valid());
    }

    #[test]
    fn test_focus_then_type_then_preset() {
        let mut state = CalculatorState::default();

        state.apply(input(Quantity::Strength, InputEvent::CustomFieldFocused));
        let snapshot = state.snapshot(1.0);
        let strength = &snapshot.slots[1];
        assert_eq!(strength.quantity, Quantity::Strength);
        assert!(strength.custom_active);
        assert!(strength.buttons.iter().all(|b| !b.selected));

        state.apply(input(
            Quantity::Strength,
            InputEvent::CustomTextChanged("10".to_string()),
        ));
        assert_eq!(state.strength.value(), 10.0);
        assert!(state.snapshot(1.0).slots[1].buttons.iter().all(|b| !b.selected));

        state.apply(input(Quantity::Strength, InputEvent::PresetSelected(10.0)));
        let snapshot = state.snapshot(1.0);
        assert!(!snapshot.slots[1].custom_active);
        assert_eq!(snapshot.slots[1].custom_text, "");
        assert_eq!(
            snapshot.slots[1]
                .buttons
                .iter()
                .filter(|b| b.selected)
                .count(),
            1
        );
    }

    #[test]
    fn test_syringe_change_only_rescales_reading() {
        let mut state = CalculatorState::default();
        state.apply(input(Quantity::Dose, InputEvent::PresetSelected(5.0)));
        state.apply(input(Quantity::Volume, InputEvent::PresetSelected(3.0)));
        state.apply(Action::SetSyringe {
            syringe: SyringeSize::Units30,
        });

        let result = state.result();
        assert!(close(result.volume_per_dose, 1.5));
        assert!(close(result.syringe_reading, 45.0));

        let snapshot = state.snapshot(1.0);
        assert!(snapshot.fill.overflow);
        assert!(close(snapshot.fill.extent, 360.0));
        assert_eq!(snapshot.formatted.syringe_reading, "45.0");
        assert_eq!(snapshot.validation.warnings().count(), 1);
    }

    #[test]
    fn test_new_rejects_non_positive_defaults() {
        assert!(CalculatorState::new(0.25, DoseUnit::Mg, 10.0, 0.0, SyringeSize::Units100).is_err());
        assert!(CalculatorState::new(-1.0, DoseUnit::Mg, 10.0, 2.0, SyringeSize::Units100).is_err());
        assert!(CalculatorState::new(0.25, DoseUnit::Mcg, 10.0, 2.0, SyringeSize::Units50).is_ok());
        assert!(
            CalculatorState::new(0.25, DoseUnit::Mg, 1e-320, 2.0, SyringeSize::Units100).is_err()
        );
    }

    #[test]
    fn test_restored_state_is_checked() {
        let state = CalculatorState::default();
        let json = serde_json::to_string(&state).unwrap();
        let restored: CalculatorState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);

        let zero_volume = json.replace(r#""value":2.0"#, r#""value":0.0"#);
        assert_ne!(zero_volume, json);
        assert!(serde_json::from_str::<CalculatorState>(&zero_volume).is_err());

        let tiny_volume = json.replace(r#""value":2.0"#, r#""value":1e-310"#);
        assert!(serde_json::from_str::<CalculatorState>(&tiny_volume).is_err());
    }

    #[test]
    fn test_action_json_round_trip() {
        let action: Action = serde_json::from_str(
            r#"{"action":"input","quantity":"dose","event":{"kind":"preset_selected","value":0.5}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            input(Quantity::Dose, InputEvent::PresetSelected(0.5))
        );

        let action: Action =
            serde_json::from_str(r#"{"action":"set_syringe","syringe":50}"#).unwrap();
        assert_eq!(
            action,
            Action::SetSyringe {
                syringe: SyringeSize::Units50
            }
        );
    }
}
