// Panel Descriptors
// Declarative panel definitions (JSON or YAML) replayed as add_* calls

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::controls::text::DEFAULT_TEXT_AREA_ROWS;
use crate::core::{ControlKind, ControlValue, DropDownItem, Panel, PanelError, PanelResult, ValueCallback, ValueDisplay};

/// A callback shared by every control that names it
pub type SharedCallback = Rc<RefCell<dyn FnMut(&ControlValue)>>;

/// Named callbacks that descriptor `callback` fields resolve against
#[derive(Default)]
pub struct CallbackScope {
    callbacks: HashMap<String, SharedCallback>,
}

impl fmt::Debug for CallbackScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.callbacks.keys().collect();
        names.sort();
        f.debug_struct("CallbackScope").field("callbacks", &names).finish()
    }
}

impl CallbackScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`; a later registration replaces it
    pub fn register<F>(&mut self, name: &str, callback: F) -> &mut Self
    where
        F: FnMut(&ControlValue) + 'static,
    {
        let shared: SharedCallback = Rc::new(RefCell::new(callback));
        self.callbacks.insert(name.to_string(), shared);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    /// Resolve a callback name for `title`; unknown names leave the control without a callback
    fn resolve(&self, title: &str, name: Option<&str>) -> Option<ValueCallback> {
        let name = name?;
        match self.callbacks.get(name) {
            Some(shared) => {
                let shared = shared.clone();
                Some(Box::new(move |value: &ControlValue| (&mut *shared.borrow_mut())(value)))
            }
            None => {
                warn!(%title, callback = name, "callback not found in scope");
                None
            }
        }
    }
}

/// Panel metadata plus an ordered list of control entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelDescriptor {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_to_grid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<u16>,
    /// Kept untyped so one bad entry cannot fail the whole descriptor
    #[serde(default)]
    pub controls: Vec<JsonValue>,
}

/// JSON is accepted through the YAML parser
impl FromStr for PanelDescriptor {
    type Err = PanelError;

    fn from_str(source: &str) -> PanelResult<Self> {
        serde_yaml::from_str(source).map_err(|e| PanelError::Parse {
            what: "descriptor",
            message: e.to_string(),
        })
    }
}

impl PanelDescriptor {
    pub fn load(path: &Path) -> PanelResult<Self> {
        let source = fs::read_to_string(path)?;
        source.parse()
    }

    /// Apply panel metadata and add every control, collecting per-entry failures
    pub fn apply(&self, panel: &mut Panel, scope: &CallbackScope) -> PanelResult<ParseReport> {
        if let Some(title) = &self.title {
            panel.set_title(title);
        }
        panel.set_position(self.x, self.y);
        if let Some(width) = self.width {
            panel.set_width(width);
        }
        if let Some(height) = self.height {
            panel.set_height(height);
        }
        if let Some(draggable) = self.draggable {
            panel.set_draggable(draggable);
        }
        if let Some(collapsible) = self.collapsible {
            panel.set_collapsible(collapsible);
        }
        if let Some(snap) = self.snap_to_grid {
            panel.set_snap_to_grid(snap);
        }
        if let Some(size) = self.grid_size {
            panel.set_grid_size(size)?;
        }

        let mut report = ParseReport::default();
        for (position, raw) in self.controls.iter().enumerate() {
            let outcome = ControlSpec::from_value(raw).and_then(|spec| spec.add_to(panel, scope));
            if let Err(err) = outcome {
                warn!(position, %err, "skipping descriptor control");
                report.skipped.push(err);
            }
        }
        debug!(title = %panel.title(), controls = panel.controls().len(), skipped = report.skipped.len(), "descriptor applied");
        Ok(report)
    }
}

/// Entries the builder could not add
#[derive(Debug, Default)]
pub struct ParseReport {
    pub skipped: Vec<PanelError>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Build a new panel from descriptor text
pub fn parse(source: &str, scope: &CallbackScope) -> PanelResult<(Panel, ParseReport)> {
    let descriptor: PanelDescriptor = source.parse()?;
    let mut panel = Panel::create(descriptor.x, descriptor.y, descriptor.title.as_deref());
    let report = descriptor.apply(&mut panel, scope)?;
    Ok((panel, report))
}

// === Control entries ===

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NumericSpec {
    pub title: String,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default)]
    pub callback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextSpec {
    pub title: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub rows: Option<u16>,
    #[serde(default)]
    pub callback: Option<String>,
}

/// Initial dropdown selection, by index or by label
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Index(usize),
    Label(String),
}

/// One control entry, dispatched on its `type` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ControlSpec {
    #[serde(rename = "range")]
    Range(NumericSpec),
    #[serde(rename = "number")]
    Number(NumericSpec),
    #[serde(rename = "boolean")]
    Boolean {
        title: String,
        #[serde(default)]
        value: bool,
        #[serde(default)]
        callback: Option<String>,
    },
    #[serde(rename = "button")]
    Button {
        title: String,
        #[serde(default)]
        callback: Option<String>,
    },
    #[serde(rename = "color")]
    Color(TextSpec),
    #[serde(rename = "text")]
    Text(TextSpec),
    #[serde(rename = "password")]
    Password(TextSpec),
    #[serde(rename = "textarea")]
    TextArea(TextSpec),
    #[serde(rename = "date")]
    Date(TextSpec),
    #[serde(rename = "time")]
    Time(TextSpec),
    #[serde(rename = "info")]
    Info {
        title: String,
        #[serde(default)]
        value: String,
    },
    #[serde(rename = "dropdown")]
    DropDown {
        title: String,
        #[serde(default)]
        items: Vec<DropDownItem>,
        #[serde(default)]
        value: Option<Selection>,
        #[serde(default)]
        callback: Option<String>,
    },
    #[serde(rename = "image")]
    Image {
        title: String,
        #[serde(default, alias = "value")]
        source: String,
    },
    #[serde(rename = "progressbar", rename_all = "camelCase")]
    ProgressBar {
        title: String,
        #[serde(default = "default_max")]
        max: f64,
        #[serde(default)]
        value: f64,
        #[serde(default)]
        value_display: ValueDisplay,
    },
    #[serde(rename = "fileChooser", rename_all = "camelCase")]
    FileChooser {
        title: String,
        #[serde(default)]
        label_str: String,
        #[serde(default)]
        filter: String,
        #[serde(default)]
        callback: Option<String>,
    },
}

fn default_max() -> f64 {
    100.0
}

fn default_step() -> f64 {
    1.0
}

impl ControlSpec {
    /// Decode one raw entry; the `type` name is matched case-insensitively
    pub fn from_value(raw: &JsonValue) -> PanelResult<Self> {
        let mut object: Map<String, JsonValue> = raw.as_object().cloned().ok_or_else(|| PanelError::Parse {
            what: "control",
            message: format!("expected an object, found {}", raw),
        })?;
        let name = object
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| PanelError::Parse {
                what: "control",
                message: "missing 'type' field".to_string(),
            })?;
        let kind = ControlKind::from_name(name).ok_or_else(|| PanelError::UnknownControlKind(name.to_string()))?;
        if kind == ControlKind::Element {
            let title = object.get("title").and_then(JsonValue::as_str).unwrap_or_default();
            return Err(PanelError::invalid_value(title, "element controls must be added in code"));
        }

        object.insert("type".to_string(), JsonValue::String(kind.as_str().to_string()));
        serde_json::from_value(JsonValue::Object(object)).map_err(|e| PanelError::Parse {
            what: "control",
            message: e.to_string(),
        })
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            ControlSpec::Range(_) => ControlKind::Range,
            ControlSpec::Number(_) => ControlKind::Number,
            ControlSpec::Boolean { .. } => ControlKind::Boolean,
            ControlSpec::Button { .. } => ControlKind::Button,
            ControlSpec::Color(_) => ControlKind::Color,
            ControlSpec::Text(_) => ControlKind::Text,
            ControlSpec::Password(_) => ControlKind::Password,
            ControlSpec::TextArea(_) => ControlKind::TextArea,
            ControlSpec::Date(_) => ControlKind::Date,
            ControlSpec::Time(_) => ControlKind::Time,
            ControlSpec::Info { .. } => ControlKind::Info,
            ControlSpec::DropDown { .. } => ControlKind::DropDown,
            ControlSpec::Image { .. } => ControlKind::Image,
            ControlSpec::ProgressBar { .. } => ControlKind::ProgressBar,
            ControlSpec::FileChooser { .. } => ControlKind::FileChooser,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ControlSpec::Range(spec) | ControlSpec::Number(spec) => &spec.title,
            ControlSpec::Color(spec)
            | ControlSpec::Text(spec)
            | ControlSpec::Password(spec)
            | ControlSpec::TextArea(spec)
            | ControlSpec::Date(spec)
            | ControlSpec::Time(spec) => &spec.title,
            ControlSpec::Boolean { title, .. }
            | ControlSpec::Button { title, .. }
            | ControlSpec::Info { title, .. }
            | ControlSpec::DropDown { title, .. }
            | ControlSpec::Image { title, .. }
            | ControlSpec::ProgressBar { title, .. }
            | ControlSpec::FileChooser { title, .. } => title,
        }
    }

    /// Add the described control to `panel`
    pub fn add_to(self, panel: &mut Panel, scope: &CallbackScope) -> PanelResult<()> {
        let kind = self.kind();
        match self {
            ControlSpec::Range(spec) | ControlSpec::Number(spec) => {
                let callback = scope.resolve(&spec.title, spec.callback.as_deref());
                let value = spec.value.unwrap_or(spec.min);
                panel.insert_numeric(kind, &spec.title, spec.min, spec.max, value, spec.step, callback)?;
            }
            ControlSpec::Boolean { title, value, callback } => {
                let callback = scope.resolve(&title, callback.as_deref());
                panel.insert_boolean(&title, value, callback)?;
            }
            ControlSpec::Button { title, callback } => {
                let callback = scope.resolve(&title, callback.as_deref());
                panel.insert_button(&title, callback)?;
            }
            ControlSpec::Color(spec) => {
                let callback = scope.resolve(&spec.title, spec.callback.as_deref());
                let value = spec.value.unwrap_or_else(|| "#000000".to_string());
                panel.insert_color(&spec.title, &value, callback)?;
            }
            ControlSpec::Text(spec) | ControlSpec::Password(spec) => {
                let callback = scope.resolve(&spec.title, spec.callback.as_deref());
                panel.insert_text(kind, &spec.title, spec.value.as_deref().unwrap_or_default(), callback)?;
            }
            ControlSpec::TextArea(spec) => {
                let rows = spec.rows.unwrap_or(DEFAULT_TEXT_AREA_ROWS);
                if rows == 0 {
                    return Err(PanelError::invalid_value(&spec.title, "a text area needs at least one row"));
                }
                let callback = scope.resolve(&spec.title, spec.callback.as_deref());
                panel.insert_text(kind, &spec.title, spec.value.as_deref().unwrap_or_default(), callback)?;
                if rows != DEFAULT_TEXT_AREA_ROWS {
                    panel.set_text_area_rows(&spec.title, rows)?;
                }
            }
            ControlSpec::Date(spec) | ControlSpec::Time(spec) => {
                let callback = scope.resolve(&spec.title, spec.callback.as_deref());
                let value = spec.value.unwrap_or_else(|| now_for(kind));
                panel.insert_temporal(kind, &spec.title, &value, callback)?;
            }
            ControlSpec::Info { title, value } => {
                panel.add_info(&title, &value)?;
            }
            ControlSpec::DropDown {
                title,
                items,
                value,
                callback,
            } => {
                let index = match value {
                    None => 0,
                    Some(Selection::Index(index)) => index,
                    Some(Selection::Label(label)) => items
                        .iter()
                        .position(|item| item.label == label)
                        .ok_or_else(|| PanelError::invalid_value(&title, format!("no item labelled '{}'", label)))?,
                };
                let callback = scope.resolve(&title, callback.as_deref());
                panel.insert_drop_down(&title, items, index, callback)?;
            }
            ControlSpec::Image { title, source } => {
                panel.add_image(&title, &source)?;
            }
            ControlSpec::ProgressBar {
                title,
                max,
                value,
                value_display,
            } => {
                panel.add_progress_bar(&title, max, value, value_display)?;
            }
            ControlSpec::FileChooser {
                title,
                label_str,
                filter,
                callback,
            } => {
                let callback = scope.resolve(&title, callback.as_deref());
                panel.insert_file_chooser(&title, &label_str, &filter, callback)?;
            }
        }
        Ok(())
    }
}

/// Current local date or time, used when a descriptor gives no value
fn now_for(kind: ControlKind) -> String {
    let now = chrono::Local::now();
    match kind {
        ControlKind::Date => now.format("%Y-%m-%d").to_string(),
        _ => now.format("%H:%M").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Capabilities, LocalZOrder};
    use serde_json::json;

    fn build(source: &str, scope: &CallbackScope) -> (Panel, ParseReport) {
        let descriptor: PanelDescriptor = source.parse().unwrap();
        let mut panel = Panel::create(0, 0, None)
            .with_z_order(Rc::new(LocalZOrder::new()))
            .with_capabilities(Capabilities::all());
        let report = descriptor.apply(&mut panel, scope).unwrap();
        (panel, report)
    }

    #[test]
    fn test_boolean_round_trip() {
        let (panel, report) = build(
            r#"{"controls": [{"type": "boolean", "title": "Enabled", "value": true}]}"#,
            &CallbackScope::new(),
        );
        assert!(report.is_clean());
        assert_eq!(JsonValue::Object(panel.values_as_json()), json!({"Enabled": true}));
    }

    #[test]
    fn test_panel_metadata_applied() {
        let (panel, _) = build(
            r#"{"x": -4, "y": 3, "title": "Render", "width": 40, "height": 12,
                "draggable": false, "collapsible": false, "snapToGrid": true, "gridSize": 8}"#,
            &CallbackScope::new(),
        );
        assert_eq!(panel.title(), "Render");
        assert_eq!(panel.position(), (-4, 3));
        assert_eq!(panel.width(), 40);
        assert_eq!(panel.height(), 12);
        assert!(!panel.is_draggable());
        assert!(!panel.is_collapsible());
        assert!(panel.snaps_to_grid());
        assert_eq!(panel.grid_size(), 8);
    }

    #[test]
    fn test_unknown_kinds_are_skipped_and_reported() {
        let (panel, report) = build(
            r#"{"controls": [
                {"type": "slider", "title": "A"},
                {"type": "range", "title": "B", "min": 0, "max": 10, "value": 3, "step": 1},
                {"type": "range", "title": "C", "min": 5, "max": 1}
            ]}"#,
            &CallbackScope::new(),
        );
        assert_eq!(panel.control_titles(), &["B".to_string()]);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(&report.skipped[0], PanelError::UnknownControlKind(name) if name == "slider"));
        assert!(matches!(&report.skipped[1], PanelError::InvalidRange { .. }));
    }

    #[test]
    fn test_zero_row_text_area_is_skipped_without_being_added() {
        let (panel, report) = build(
            r#"{"controls": [
                {"type": "textarea", "title": "Notes", "rows": 0},
                {"type": "textarea", "title": "Log", "rows": 3}
            ]}"#,
            &CallbackScope::new(),
        );
        assert_eq!(panel.control_titles(), &["Log".to_string()]);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(&report.skipped[0], PanelError::InvalidValue { title, .. } if title == "Notes"));
    }

    #[test]
    fn test_callbacks_resolve_by_name() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut scope = CallbackScope::new();
        scope.register("onChange", move |value| sink.borrow_mut().push(value.clone()));

        let (mut panel, _) = build(
            r#"{"controls": [
                {"type": "range", "title": "Speed", "min": 0, "max": 10, "value": 5, "callback": "onChange"},
                {"type": "boolean", "title": "On", "callback": "onChange"},
                {"type": "text", "title": "Name", "callback": "missing"}
            ]}"#,
            &scope,
        );
        panel.set_range_value("Speed", 7.0).unwrap();
        panel.set_boolean("On", true).unwrap();
        assert_eq!(*seen.borrow(), vec![ControlValue::Number(7.0), ControlValue::Bool(true)]);
        assert!(!panel.control("Name").unwrap().has_callback());
    }

    #[test]
    fn test_yaml_descriptor() {
        let source = r#"
title: Lights
controls:
  - type: fileChooser
    title: Texture
    labelStr: Pick one
    filter: image/*
  - type: HTML
    title: About
    value: hello
  - type: progressbar
    title: Load
    max: 50
    value: 10
    valueDisplay: percent
  - type: dropdown
    title: Mode
    items: [fast, slow]
    value: slow
  - type: textarea
    title: Notes
    rows: 5
"#;
        let (panel, report) = build(source, &CallbackScope::new());
        assert!(report.is_clean(), "{:?}", report);
        assert_eq!(panel.title(), "Lights");
        assert_eq!(panel.control("About").unwrap().kind(), ControlKind::Info);
        assert_eq!(panel.control("Load").unwrap().label(), Some("Load: 20%"));
        assert_eq!(panel.get_drop_down_value("Mode").unwrap().unwrap().label, "slow");
        assert_eq!(panel.accept_filter("Texture").unwrap().patterns().len(), 7);
    }

    #[test]
    fn test_element_cannot_be_described() {
        let (panel, report) = build(
            r#"{"controls": [{"type": "element", "title": "Canvas"}]}"#,
            &CallbackScope::new(),
        );
        assert!(panel.controls().is_empty());
        assert!(matches!(&report.skipped[0], PanelError::InvalidValue { title, .. } if title == "Canvas"));
    }

    #[test]
    fn test_malformed_descriptor_fails() {
        assert!(matches!(
            "controls: [unterminated".parse::<PanelDescriptor>(),
            Err(PanelError::Parse { what: "descriptor", .. })
        ));
    }

    #[test]
    fn test_default_date_is_today() {
        let (panel, _) = build(r#"{"controls": [{"type": "date", "title": "Day"}]}"#, &CallbackScope::new());
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(panel.get_date("Day").unwrap(), today);
    }
}
