// Numeric Controls
// Range sliders and number fields share one constructor, parameterised by kind

use std::cell::RefCell;
use std::rc::Rc;

use super::number_callback;
use crate::core::bind::bind_callback;
use crate::core::{
    BindTarget, ControlData, ControlEntry, ControlKind, Panel, PanelError, PanelResult,
    ValueCallback,
};

const NUMERIC: &[ControlKind] = &[ControlKind::Range, ControlKind::Number];

impl Panel {
    /// Shared constructor for range and number controls
    pub(crate) fn insert_numeric(
        &mut self,
        kind: ControlKind,
        title: &str,
        min: f64,
        max: f64,
        value: f64,
        step: f64,
        callback: Option<ValueCallback>,
    ) -> PanelResult<&mut Self> {
        validate_bounds(title, min, max, step)?;
        let value = constrain(kind, value, min, max, step);
        let entry = ControlEntry::new(title, kind, ControlData::Numeric { min, max, step, value })
            .with_callback(callback);
        self.register(entry)
    }

    /// Add a slider; the value is kept inside `[min, max]` on the step grid
    pub fn add_range<F>(
        &mut self,
        title: &str,
        min: f64,
        max: f64,
        value: f64,
        step: f64,
        callback: F,
    ) -> PanelResult<&mut Self>
    where
        F: FnMut(f64) + 'static,
    {
        self.insert_numeric(ControlKind::Range, title, min, max, value, step, Some(number_callback(callback)))
    }

    /// Add a number field; values outside the bounds are accepted as typed
    pub fn add_number<F>(
        &mut self,
        title: &str,
        min: f64,
        max: f64,
        value: f64,
        step: f64,
        callback: F,
    ) -> PanelResult<&mut Self>
    where
        F: FnMut(f64) + 'static,
    {
        self.insert_numeric(ControlKind::Number, title, min, max, value, step, Some(number_callback(callback)))
    }

    /// Add a slider that writes its value into `target[title]`
    pub fn bind_range<T>(
        &mut self,
        title: &str,
        min: f64,
        max: f64,
        value: f64,
        step: f64,
        target: Rc<RefCell<T>>,
    ) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_numeric(ControlKind::Range, title, min, max, value, step, Some(callback))
    }

    /// Add a number field that writes its value into `target[title]`
    pub fn bind_number<T>(
        &mut self,
        title: &str,
        min: f64,
        max: f64,
        value: f64,
        step: f64,
        target: Rc<RefCell<T>>,
    ) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_numeric(ControlKind::Number, title, min, max, value, step, Some(callback))
    }

    pub fn get_range_value(&self, title: &str) -> PanelResult<f64> {
        self.numeric_value(title)
    }

    pub fn get_number_value(&self, title: &str) -> PanelResult<f64> {
        self.numeric_value(title)
    }

    fn numeric_value(&self, title: &str) -> PanelResult<f64> {
        match self.control_of(title, NUMERIC)?.data() {
            ControlData::Numeric { value, .. } => Ok(*value),
            _ => unreachable!("numeric kinds always carry numeric data"),
        }
    }

    /// Set a slider's value and fire its callbacks once
    pub fn set_range_value(&mut self, title: &str, value: f64) -> PanelResult<&mut Self> {
        self.apply_numeric(title, value)
    }

    /// Set a number field's value and fire its callbacks once
    pub fn set_number_value(&mut self, title: &str, value: f64) -> PanelResult<&mut Self> {
        self.apply_numeric(title, value)
    }

    pub(crate) fn apply_numeric(&mut self, title: &str, value: f64) -> PanelResult<&mut Self> {
        check_finite(title, value)?;
        let entry = self.control_of_mut(title, NUMERIC)?;
        let kind = entry.kind();
        if let ControlData::Numeric { min, max, step, value: current } = &mut entry.data {
            *current = constrain(kind, value, *min, *max, *step);
        }
        entry.refresh_label();
        self.notify(title);
        Ok(self)
    }

    /// Change a slider's bounds; the current value is re-constrained without firing callbacks
    pub fn set_range_parameters(&mut self, title: &str, min: f64, max: f64, step: f64) -> PanelResult<&mut Self> {
        self.apply_numeric_parameters(title, min, max, step)
    }

    pub fn set_number_parameters(&mut self, title: &str, min: f64, max: f64, step: f64) -> PanelResult<&mut Self> {
        self.apply_numeric_parameters(title, min, max, step)
    }

    fn apply_numeric_parameters(&mut self, title: &str, min: f64, max: f64, step: f64) -> PanelResult<&mut Self> {
        validate_bounds(title, min, max, step)?;
        let entry = self.control_of_mut(title, NUMERIC)?;
        let kind = entry.kind();
        if let ControlData::Numeric { min: lo, max: hi, step: st, value } = &mut entry.data {
            *lo = min;
            *hi = max;
            *st = step;
            *value = constrain(kind, *value, min, max, step);
        }
        entry.refresh_label();
        Ok(self)
    }

    /// Move a numeric control by whole steps (keyboard input)
    pub(crate) fn step_numeric(&mut self, title: &str, steps: i32) -> PanelResult<&mut Self> {
        let (value, step) = match self.control_of(title, NUMERIC)?.data() {
            ControlData::Numeric { value, step, .. } => (*value, *step),
            _ => unreachable!("numeric kinds always carry numeric data"),
        };
        self.apply_numeric(title, value + f64::from(steps) * step)
    }

    /// Set a slider from a position along its track, `0.0..=1.0` (pointer input)
    pub(crate) fn set_numeric_fraction(&mut self, title: &str, fraction: f64) -> PanelResult<&mut Self> {
        let (min, max) = match self.control_of(title, NUMERIC)?.data() {
            ControlData::Numeric { min, max, .. } => (*min, *max),
            _ => unreachable!("numeric kinds always carry numeric data"),
        };
        self.apply_numeric(title, min + fraction.clamp(0.0, 1.0) * (max - min))
    }
}

/// Position of a numeric value along its track, `0.0..=1.0`
pub fn track_fraction(min: f64, max: f64, value: f64) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn validate_bounds(title: &str, min: f64, max: f64, step: f64) -> PanelResult<()> {
    if min.is_finite() && max.is_finite() && step.is_finite() && min <= max && step > 0.0 {
        Ok(())
    } else {
        Err(PanelError::InvalidRange {
            title: title.to_string(),
            min,
            max,
            step,
        })
    }
}

/// Ranges clamp and snap to the step grid like a native slider; number fields keep the value
fn constrain(kind: ControlKind, value: f64, min: f64, max: f64, step: f64) -> f64 {
    if kind != ControlKind::Range {
        return value;
    }
    let steps = ((value.clamp(min, max) - min) / step).round();
    let mut snapped = min + steps * step;
    if snapped > max {
        snapped -= step;
    }
    round_to_precision(snapped.max(min), step)
}

/// Drop float noise (0.30000000000000004) by rounding to the step's decimal places
fn round_to_precision(value: f64, step: f64) -> f64 {
    let text = format!("{}", step);
    let decimals = text.split_once('.').map_or(0, |(_, frac)| frac.len()) as i32;
    let factor = 10f64.powi(decimals.min(12));
    (value * factor).round() / factor
}

pub(crate) fn check_finite(title: &str, value: f64) -> PanelResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PanelError::invalid_value(title, "value must be finite"))
    }
}
