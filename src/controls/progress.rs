// Progress Bar Control

use crate::core::{ControlData, ControlEntry, ControlKind, Panel, PanelResult, ValueDisplay};

const PROGRESS: &[ControlKind] = &[ControlKind::ProgressBar];

impl Panel {
    /// Add a progress bar; the label shows `value / max`, a percentage or nothing
    pub fn add_progress_bar(&mut self, title: &str, max: f64, value: f64, display: ValueDisplay) -> PanelResult<&mut Self> {
        let entry = ControlEntry::new(title, ControlKind::ProgressBar, ControlData::Progress { value, max, display });
        self.register(entry)
    }

    /// `(value, max)`
    pub fn get_progress(&self, title: &str) -> PanelResult<(f64, f64)> {
        match self.control_of(title, PROGRESS)?.data() {
            ControlData::Progress { value, max, .. } => Ok((*value, *max)),
            _ => unreachable!("progress bars always carry progress data"),
        }
    }

    /// Update the value and optionally the maximum
    /// Values above the maximum are kept; the bar simply overflows.
    pub fn set_progress(&mut self, title: &str, value: f64, max: Option<f64>) -> PanelResult<&mut Self> {
        let entry = self.control_of_mut(title, PROGRESS)?;
        if let ControlData::Progress { value: v, max: m, .. } = &mut entry.data {
            *v = value;
            if let Some(max) = max {
                *m = max;
            }
        }
        entry.refresh_label();
        Ok(self)
    }

    pub fn set_progress_display(&mut self, title: &str, display: ValueDisplay) -> PanelResult<&mut Self> {
        let entry = self.control_of_mut(title, PROGRESS)?;
        if let ControlData::Progress { display: d, .. } = &mut entry.data {
            *d = display;
        }
        entry.refresh_label();
        Ok(self)
    }

    /// Fill ratio `value / max`, unclamped; zero when `max` is zero
    pub fn progress_ratio(&self, title: &str) -> PanelResult<f64> {
        let (value, max) = self.get_progress(title)?;
        Ok(if max == 0.0 { 0.0 } else { value / max })
    }
}
