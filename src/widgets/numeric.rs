//! Integer and float inputs honoring a range
//!
//! Free typing goes into a text buffer. On commit (focus lost or Enter) the
//! text is parsed and clamped to the range; unparsable input restores the
//! last committed value.

use log::warn;

use super::{show_error, show_notice, FieldWidget, WidgetEnv, WidgetKind};
use crate::constants::widget::{DEFAULT_FLOAT_STEP, DEFAULT_INT_STEP, NUMERIC_WIDTH};
use crate::error::FieldError;
use crate::fields::{FieldDescriptor, FieldValue, RangeSpec, TypeTag, UpdatePayload};

#[derive(Debug, Clone)]
pub struct NumericWidget {
    integer: bool,
    range: Option<RangeSpec>,
    value: f64,
    buffer: String,
    notice: Option<String>,
    error: Option<FieldError>,
}

impl NumericWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        let integer = descriptor.type_tag == TypeTag::Int;
        let initial = value.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0);
        let initial = if integer { initial.round() } else { initial };
        Self {
            integer,
            range: descriptor.range,
            value: initial,
            buffer: format_number(initial, integer),
            notice: None,
            error: None,
        }
    }

    pub fn current(&self) -> f64 {
        self.value
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn step(&self) -> f64 {
        let fallback = if self.integer { DEFAULT_INT_STEP } else { DEFAULT_FLOAT_STEP };
        self.range
            .and_then(|range| range.step)
            .filter(|step| *step > 0.0)
            .unwrap_or(fallback)
    }

    /// Parse, clamp and emit. Invalid text leaves the value unchanged.
    pub fn commit(&mut self, input: &str) -> Result<UpdatePayload, FieldError> {
        let parsed = input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite());

        let Some(parsed) = parsed else {
            warn!("Rejected numeric input '{}'", input);
            self.buffer = format_number(self.value, self.integer);
            let error = FieldError::InvalidNumber {
                input: input.to_string(),
            };
            self.error = Some(error.clone());
            return Err(error);
        };

        self.error = None;
        Ok(self.set(parsed))
    }

    /// Commit typed text, emitting only when the stored value moves
    pub fn commit_edit(&mut self, input: &str) -> Option<UpdatePayload> {
        let before = self.as_field_value();
        self.commit(input).ok().filter(|payload| payload.value != before)
    }

    pub fn step_up(&mut self) -> UpdatePayload {
        self.set(self.value + self.step())
    }

    pub fn step_down(&mut self) -> UpdatePayload {
        self.set(self.value - self.step())
    }

    /// Effective bounds; integers use the whole numbers inside the range
    fn bounds(&self) -> Option<RangeSpec> {
        let range = self.range?;
        if self.integer {
            let (min, max) = (range.min.ceil(), range.max.floor());
            if min <= max {
                return Some(RangeSpec { min, max, ..range });
            }
        }
        Some(range)
    }

    fn set(&mut self, raw: f64) -> UpdatePayload {
        let rounded = if self.integer { raw.round() } else { raw };
        let bounds = self.bounds();
        let clamped = match &bounds {
            Some(range) => range.clamp(rounded),
            None => rounded,
        };

        self.notice = match &bounds {
            Some(range) if clamped != rounded => Some(format!(
                "Clamped to range [{}, {}]",
                format_number(range.min, self.integer),
                format_number(range.max, self.integer)
            )),
            _ => None,
        };

        self.value = clamped;
        self.buffer = format_number(clamped, self.integer);
        UpdatePayload::new(self.as_field_value())
    }

    fn as_field_value(&self) -> FieldValue {
        if self.integer {
            FieldValue::Int(self.value as i64)
        } else {
            FieldValue::Float(self.value)
        }
    }
}

fn format_number(value: f64, integer: bool) -> String {
    if integer {
        format!("{}", value.round() as i64)
    } else {
        format!("{}", value)
    }
}

impl FieldWidget for NumericWidget {
    fn kind(&self) -> WidgetKind {
        if self.integer {
            WidgetKind::Integer
        } else {
            WidgetKind::Float
        }
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut change = None;

        ui.add_enabled_ui(!env.disabled, |ui| {
            ui.horizontal(|ui| {
                if ui.small_button("−").clicked() {
                    change = Some(self.step_down());
                }

                let mut buffer = self.buffer.clone();
                let response = ui.add(egui::TextEdit::singleline(&mut buffer).desired_width(NUMERIC_WIDTH));
                if response.changed() {
                    self.buffer = buffer;
                }
                if response.lost_focus() {
                    let input = self.buffer.clone();
                    change = self.commit_edit(&input);
                }

                if ui.small_button("+").clicked() {
                    change = Some(self.step_up());
                }
            });
        });

        if let Some(error) = &self.error {
            show_error(ui, error);
        } else if let Some(notice) = &self.notice {
            show_notice(ui, notice);
        }
        change
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.value = empty.as_f64().unwrap_or(0.0);
        self.buffer = format_number(self.value, self.integer);
        self.notice = None;
        self.error = None;
    }

    fn value(&self) -> FieldValue {
        self.as_field_value()
    }

    fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_widget() -> NumericWidget {
        let descriptor = FieldDescriptor::new("top_k", TypeTag::Int).with_range(RangeSpec::new(0.0, 10.0));
        NumericWidget::new(&descriptor, &FieldValue::Int(5))
    }

    #[test]
    fn test_commit_clamps_to_bounds() {
        let mut w = int_widget();
        assert_eq!(w.commit("15").unwrap().value, FieldValue::Int(10));
        assert_eq!(w.buffer(), "10");
        assert!(w.notice().is_some());

        assert_eq!(w.commit("-5").unwrap().value, FieldValue::Int(0));
        assert_eq!(w.current(), 0.0);
    }

    #[test]
    fn test_in_range_has_no_notice() {
        let mut w = int_widget();
        assert_eq!(w.commit("7").unwrap().value, FieldValue::Int(7));
        assert!(w.notice().is_none());
    }

    #[test]
    fn test_invalid_input_keeps_value() {
        let mut w = int_widget();
        let err = w.commit("abc").unwrap_err();
        assert_eq!(err, FieldError::InvalidNumber { input: "abc".into() });
        assert_eq!(w.value(), FieldValue::Int(5));
        assert_eq!(w.buffer(), "5");

        assert!(w.commit("NaN").is_err());
        assert!(w.commit("inf").is_err());
    }

    #[test]
    fn test_float_steps_and_clamps() {
        let descriptor = FieldDescriptor::new("temperature", TypeTag::Float)
            .with_range(RangeSpec::new(0.0, 1.0).with_step(0.5));
        let mut w = NumericWidget::new(&descriptor, &FieldValue::Float(0.5));
        assert_eq!(w.kind(), WidgetKind::Float);
        assert_eq!(w.step_up().value, FieldValue::Float(1.0));
        assert_eq!(w.step_up().value, FieldValue::Float(1.0));
        assert_eq!(w.step_down().value, FieldValue::Float(0.5));
    }

    #[test]
    fn test_int_clamps_inside_fractional_bounds() {
        let descriptor = FieldDescriptor::new("n", TypeTag::Int).with_range(RangeSpec::new(0.5, 9.5));
        let mut w = NumericWidget::new(&descriptor, &FieldValue::Int(5));
        assert_eq!(w.commit("0").unwrap().value, FieldValue::Int(1));
        assert_eq!(w.notice(), Some("Clamped to range [1, 9]"));
        assert_eq!(w.commit("12").unwrap().value, FieldValue::Int(9));
        assert_eq!(w.step_up().value, FieldValue::Int(9));
    }

    #[test]
    fn test_unchanged_commit_emits_nothing() {
        let mut w = int_widget();
        assert!(w.commit_edit("5").is_none());
        assert!(w.commit_edit(" 5.0 ").is_none());
        assert!(w.commit_edit("abc").is_none());
        assert_eq!(w.commit_edit("6").unwrap().value, FieldValue::Int(6));

        // Clamped back onto the current value: nothing new to record
        assert_eq!(w.commit_edit("10").unwrap().value, FieldValue::Int(10));
        assert!(w.commit_edit("99").is_none());
        assert_eq!(w.buffer(), "10");
        assert!(w.notice().is_some());
    }

    #[test]
    fn test_int_rounds_input() {
        let mut w = int_widget();
        assert_eq!(w.commit("3.6").unwrap().value, FieldValue::Int(4));
    }
}
