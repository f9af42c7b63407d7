use crate::dose::arithmetic::ensure_positive;
use crate::dose::error::DoseError;
use crate::dose::parser::parse_positive;
use crate::dose::types::{DoseUnit, Quantity};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Which input surface last claimed a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSource {
    #[default]
    Preset,
    Custom,
}

/// A user action on one slot's preset buttons or custom field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputEvent {
    PresetSelected(f64),
    CustomTextChanged(String),
    CustomFieldFocused,
}

/// One calculator input. `value` is canonical (mg or mL) and always
/// positive; the raw custom text is kept verbatim even when it does not
/// parse, so the field redisplays exactly what was typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SlotRecord")]
pub struct QuantitySlot {
    pub quantity: Quantity,
    value: f64,
    source: SlotSource,
    custom_text: String,
}

/// Wire form of a slot, checked before it becomes a [`QuantitySlot`]
#[derive(Deserialize)]
struct SlotRecord {
    quantity: Quantity,
    value: f64,
    #[serde(default)]
    source: SlotSource,
    #[serde(default)]
    custom_text: String,
}

impl TryFrom<SlotRecord> for QuantitySlot {
    type Error = DoseError;

    fn try_from(record: SlotRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            quantity: record.quantity,
            value: ensure_positive(record.quantity, record.value)?,
            source: record.source,
            custom_text: record.custom_text,
        })
    }
}

impl QuantitySlot {
    /// Start from a preset-sourced canonical value. `value` must be positive.
    pub fn new(quantity: Quantity, value: f64) -> Self {
        debug_assert!(value.is_finite() && value > 0.0);
        Self {
            quantity,
            value,
            source: SlotSource::Preset,
            custom_text: String::new(),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn source(&self) -> SlotSource {
        self.source
    }

    pub fn custom_text(&self) -> &str {
        &self.custom_text
    }

    /// Canonical value expressed in `display_unit` (dose slot only)
    pub fn display_value(&self, display_unit: Option<DoseUnit>) -> f64 {
        match display_unit {
            Some(unit) => unit.from_mg(self.value),
            None => self.value,
        }
    }

    /// Whether the preset button for `preset` (in display units) is lit
    pub fn is_preset_selected(&self, preset: f64, display_unit: Option<DoseUnit>) -> bool {
        self.source == SlotSource::Preset && self.display_value(display_unit) == preset
    }

    /// Canonical value the custom text would set, `None` when the field is
    /// empty
    pub fn custom_candidate(
        &self,
        display_unit: Option<DoseUnit>,
    ) -> Option<Result<f64, DoseError>> {
        if self.custom_text.is_empty() {
            return None;
        }
        Some(
            parse_positive(self.quantity, &self.custom_text)
                .map(|parsed| to_canonical(parsed, display_unit)),
        )
    }

    /// Apply one event in place. `display_unit` is the unit new entries are
    /// typed in; pass `None` for slots without a unit lens.
    pub fn apply(&mut self, event: &InputEvent, display_unit: Option<DoseUnit>) {
        self.apply_checked(event, display_unit, |_| Ok(()));
    }

    /// Like [`QuantitySlot::apply`], but a new canonical value only takes
    /// effect when `accept` allows it. Rejected custom text is still kept.
    pub fn apply_checked<F>(
        &mut self,
        event: &InputEvent,
        display_unit: Option<DoseUnit>,
        accept: F,
    ) where
        F: Fn(f64) -> Result<(), DoseError>,
    {
        match event {
            InputEvent::PresetSelected(preset) => {
                let candidate = ensure_positive(self.quantity, *preset)
                    .map(|preset| to_canonical(preset, display_unit))
                    .and_then(|value| accept(value).map(|_| value));
                match candidate {
                    Ok(value) => {
                        self.value = value;
                        self.source = SlotSource::Preset;
                        self.custom_text.clear();
                    }
                    Err(e) => warn!("Ignoring {} preset {}: {}", self.quantity, preset, e),
                }
            }
            InputEvent::CustomTextChanged(text) => {
                self.custom_text = text.clone();
                let candidate = parse_positive(self.quantity, text)
                    .map(|parsed| to_canonical(parsed, display_unit))
                    .and_then(|value| accept(value).map(|_| value));
                match candidate {
                    Ok(value) => {
                        self.value = value;
                        self.source = SlotSource::Custom;
                    }
                    Err(e) => debug!("Keeping previous {} value: {}", self.quantity, e),
                }
            }
            InputEvent::CustomFieldFocused => {
                self.source = SlotSource::Custom;
            }
        }
    }
}

fn to_canonical(value: f64, display_unit: Option<DoseUnit>) -> f64 {
    match display_unit {
        Some(unit) => unit.to_mg(value),
        None => value,
    }
}

/// Pure transition: the slot that results from `event`
pub fn reconcile(
    slot: &QuantitySlot,
    event: &InputEvent,
    display_unit: Option<DoseUnit>,
) -> QuantitySlot {
    let mut next = slot.clone();
    next.apply(event, display_unit);
    next
}
