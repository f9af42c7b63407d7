// WebAssembly bindings for the browser calculator page
use crate::config::Config;
use crate::dose;
use crate::input::{self, Action, CalculatorState, InputEvent};
use crate::optimizer::{OptimizerForm, INVALID_INPUT_MESSAGE};
use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct CalculatorWasm {
    config: Config,
    state: CalculatorState,
    optimizer: OptimizerForm,
}

impl Default for CalculatorWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl CalculatorWasm {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: Config::empty(),
            state: CalculatorState::default(),
            optimizer: OptimizerForm::new(),
        }
    }

    /// Start from a TOML config string instead of the built-in defaults
    #[wasm_bindgen]
    pub fn with_config(config_content: &str) -> Result<CalculatorWasm, JsValue> {
        let config = Config::load_from_str(config_content)
            .map_err(|e| JsValue::from_str(&format!("Failed to load config: {}", e)))?;
        let state = config
            .initial_state()
            .map_err(|e| JsValue::from_str(&format!("Invalid defaults: {}", e)))?;

        Ok(Self {
            config,
            state,
            optimizer: OptimizerForm::new(),
        })
    }

    /// Preset button clicked. `value` is in the unit shown on the button.
    #[wasm_bindgen]
    pub fn select_preset(&mut self, quantity: &str, value: f64) -> Result<(), JsValue> {
        self.input(quantity, InputEvent::PresetSelected(value))
    }

    /// Custom field edited; `text` is the field's full current contents
    #[wasm_bindgen]
    pub fn custom_text_changed(&mut self, quantity: &str, text: &str) -> Result<(), JsValue> {
        self.input(quantity, InputEvent::CustomTextChanged(text.to_string()))
    }

    #[wasm_bindgen]
    pub fn custom_field_focused(&mut self, quantity: &str) -> Result<(), JsValue> {
        self.input(quantity, InputEvent::CustomFieldFocused)
    }

    #[wasm_bindgen]
    pub fn set_dose_unit(&mut self, unit: &str) -> Result<(), JsValue> {
        let unit = unit
            .parse()
            .map_err(|e: dose::DoseError| JsValue::from_str(&e.to_string()))?;
        self.state.apply(Action::SetDoseUnit { unit });
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_syringe(&mut self, capacity_units: u32) -> Result<(), JsValue> {
        let syringe = dose::SyringeSize::try_from(capacity_units)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.state.apply(Action::SetSyringe { syringe });
        Ok(())
    }

    /// Apply an action given as JSON, e.g. `{"action":"set_syringe","syringe":30}`
    #[wasm_bindgen]
    pub fn dispatch(&mut self, action_json: &str) -> Result<(), JsValue> {
        let action: Action = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse action JSON: {}", e)))?;
        self.state.apply(action);
        Ok(())
    }

    /// Current derived view (result, formatted labels, fill, advisories,
    /// preset rows) as a JSON string
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<String, JsValue> {
        let snapshot = self
            .state
            .snapshot(self.config.warnings.low_reading_units);

        serde_json::to_string(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize snapshot: {}", e)))
    }

    /// Preset values for one quantity under the current dose unit
    #[wasm_bindgen]
    pub fn presets(&self, quantity: &str) -> Result<Float64Array, JsValue> {
        let quantity = parse_quantity(quantity)?;
        let values = input::presets_for(quantity, self.state.dose_unit);
        Ok(Float64Array::from(values))
    }

    /// Run the diluent optimizer. On failure the error message is also kept
    /// on the form and any earlier result is cleared.
    #[wasm_bindgen]
    pub fn optimize(&mut self, dose_text: &str, strength_text: &str) -> Result<f64, JsValue> {
        self.optimizer.dose_text = dose_text.to_string();
        self.optimizer.strength_text = strength_text.to_string();
        self.optimizer
            .calculate()
            .map_err(|e| JsValue::from_str(&format!("{} ({})", INVALID_INPUT_MESSAGE, e)))
    }

    #[wasm_bindgen]
    pub fn optimizer_summary(&self) -> Option<String> {
        self.optimizer.summary()
    }

    /// Message left on the optimizer form by the last failed run or clear
    #[wasm_bindgen]
    pub fn optimizer_error(&self) -> Option<String> {
        self.optimizer.error().map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn reset_optimizer(&mut self) {
        self.optimizer.reset();
    }

    /// Empty the optimizer fields and show `notice` in place of a result
    #[wasm_bindgen]
    pub fn clear_optimizer(&mut self, notice: &str) {
        self.optimizer.clear_with_notice(notice);
    }

    /// Fill width for an arbitrary reading, for callers drawing their own syringe
    #[wasm_bindgen]
    pub fn fill_extent(reading: f64, capacity_units: u32) -> Result<f64, JsValue> {
        let syringe = dose::SyringeSize::try_from(capacity_units)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(dose::map_to_fill_extent(reading, syringe))
    }
}

impl CalculatorWasm {
    fn input(&mut self, quantity: &str, event: InputEvent) -> Result<(), JsValue> {
        let quantity = parse_quantity(quantity)?;
        self.state.apply(Action::Input { quantity, event });
        Ok(())
    }
}

fn parse_quantity(quantity: &str) -> Result<dose::Quantity, JsValue> {
    quantity
        .parse()
        .map_err(|e: dose::DoseError| JsValue::from_str(&e.to_string()))
}
