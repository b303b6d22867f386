// Control Records
// Kinds, values and the per-title entry stored in a panel's registry

use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::PathBuf;

use crate::utilities::format_number;

/// Every kind of control a panel can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Range,
    Number,
    Boolean,
    Button,
    Color,
    Text,
    Password,
    TextArea,
    Date,
    Time,
    Info,
    DropDown,
    Image,
    ProgressBar,
    FileChooser,
    Element,
}

impl ControlKind {
    /// Name used in descriptors
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::Range => "range",
            ControlKind::Number => "number",
            ControlKind::Boolean => "boolean",
            ControlKind::Button => "button",
            ControlKind::Color => "color",
            ControlKind::Text => "text",
            ControlKind::Password => "password",
            ControlKind::TextArea => "textarea",
            ControlKind::Date => "date",
            ControlKind::Time => "time",
            ControlKind::Info => "info",
            ControlKind::DropDown => "dropdown",
            ControlKind::Image => "image",
            ControlKind::ProgressBar => "progressbar",
            ControlKind::FileChooser => "fileChooser",
            ControlKind::Element => "element",
        }
    }

    /// Parse a descriptor type name. `html` is accepted as an alias of `info`.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "range" => ControlKind::Range,
            "number" => ControlKind::Number,
            "boolean" => ControlKind::Boolean,
            "button" => ControlKind::Button,
            "color" => ControlKind::Color,
            "text" => ControlKind::Text,
            "password" => ControlKind::Password,
            "textarea" => ControlKind::TextArea,
            "date" => ControlKind::Date,
            "time" => ControlKind::Time,
            "info" | "html" => ControlKind::Info,
            "dropdown" => ControlKind::DropDown,
            "image" => ControlKind::Image,
            "progressbar" => ControlKind::ProgressBar,
            "filechooser" => ControlKind::FileChooser,
            "element" => ControlKind::Element,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds whose current value is exported by `values_as_json`
    pub fn is_valued(&self) -> bool {
        matches!(
            self,
            ControlKind::Range
                | ControlKind::Number
                | ControlKind::Boolean
                | ControlKind::Color
                | ControlKind::Text
                | ControlKind::Password
                | ControlKind::TextArea
                | ControlKind::Date
                | ControlKind::Time
                | ControlKind::DropDown
                | ControlKind::FileChooser
        )
    }

    /// Kinds that take keyboard focus
    pub fn is_focusable(&self) -> bool {
        self.is_valued() || matches!(self, ControlKind::Button)
    }

    /// Kinds edited through a text buffer
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            ControlKind::Color
                | ControlKind::Text
                | ControlKind::Password
                | ControlKind::TextArea
                | ControlKind::Date
                | ControlKind::Time
        )
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a progress bar renders its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueDisplay {
    #[default]
    Numbers,
    Percent,
    None,
}

/// One option of a dropdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DropDownItemRepr")]
pub struct DropDownItem {
    pub label: String,
    pub value: JsonValue,
}

impl DropDownItem {
    pub fn new(label: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl From<&str> for DropDownItem {
    fn from(label: &str) -> Self {
        Self::new(label, label)
    }
}

impl From<String> for DropDownItem {
    fn from(label: String) -> Self {
        Self {
            value: JsonValue::String(label.clone()),
            label,
        }
    }
}

/// Items may be written as plain strings or as `{label, value}` objects
#[derive(Deserialize)]
#[serde(untagged)]
enum DropDownItemRepr {
    Plain(String),
    Full { label: String, value: JsonValue },
}

impl From<DropDownItemRepr> for DropDownItem {
    fn from(repr: DropDownItemRepr) -> Self {
        match repr {
            DropDownItemRepr::Plain(label) => DropDownItem::from(label),
            DropDownItemRepr::Full { label, value } => DropDownItem { label, value },
        }
    }
}

/// The selected option of a dropdown
#[derive(Debug, Clone, PartialEq)]
pub struct DropDownSelection {
    pub index: usize,
    pub label: String,
    pub value: JsonValue,
}

/// Reference to a button handed to its callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonRef {
    pub title: String,
}

/// The current value of a control, typed by kind
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Selection(DropDownSelection),
    File(Option<PathBuf>),
    Progress { value: f64, max: f64 },
    Button(ButtonRef),
    Empty,
}

impl ControlValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ControlValue::Number(n) => Some(*n),
            ControlValue::Progress { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ControlValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ControlValue::Text(s) => Some(s),
            ControlValue::Selection(sel) => Some(&sel.label),
            _ => None,
        }
    }

    /// JSON form used by value export; `None` means "omit"
    pub fn to_json(&self) -> Option<JsonValue> {
        match self {
            ControlValue::Number(n) => serde_json::Number::from_f64(*n).map(JsonValue::Number),
            ControlValue::Bool(b) => Some(JsonValue::Bool(*b)),
            ControlValue::Text(s) => Some(JsonValue::String(s.clone())),
            ControlValue::Selection(sel) => Some(JsonValue::String(sel.label.clone())),
            ControlValue::File(Some(path)) => Some(JsonValue::String(path.display().to_string())),
            ControlValue::File(None)
            | ControlValue::Progress { .. }
            | ControlValue::Button(_)
            | ControlValue::Empty => None,
        }
    }
}

/// A caller-supplied widget hosted verbatim by an `element` control
pub trait PanelElement {
    /// Rows needed at the given width
    fn height(&self, width: u16) -> u16;

    fn render(&self, area: Rect, buf: &mut Buffer);
}

impl fmt::Debug for dyn PanelElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PanelElement")
    }
}

/// Callback stored on an entry; typed wrappers adapt user closures to this form
pub type ValueCallback = Box<dyn FnMut(&ControlValue)>;

/// Panel-wide handler, called with the control title after the control's own callback
pub type GlobalChangeHandler = Box<dyn FnMut(&str, &ControlValue)>;

/// Kind-specific state
#[derive(Debug)]
pub enum ControlData {
    Numeric {
        min: f64,
        max: f64,
        step: f64,
        value: f64,
    },
    Boolean(bool),
    Button,
    Text {
        value: String,
        rows: u16,
    },
    Info(String),
    DropDown {
        items: Vec<DropDownItem>,
        index: usize,
    },
    Image {
        source: String,
    },
    Progress {
        value: f64,
        max: f64,
        display: ValueDisplay,
    },
    FileChooser {
        label: String,
        filter: String,
        chosen: Option<PathBuf>,
    },
    Element(Box<dyn PanelElement>),
}

/// A registered control
pub struct ControlEntry {
    title: String,
    kind: ControlKind,
    pub(crate) data: ControlData,
    label: Option<String>,
    pub(crate) callback: Option<ValueCallback>,
    pub(crate) enabled: bool,
    pub(crate) visible: bool,
    pub(crate) style: Style,
    native: bool,
}

impl fmt::Debug for ControlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlEntry")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("data", &self.data)
            .field("label", &self.label)
            .field("has_callback", &self.callback.is_some())
            .field("enabled", &self.enabled)
            .field("visible", &self.visible)
            .field("native", &self.native)
            .finish()
    }
}

impl ControlEntry {
    pub fn new(title: &str, kind: ControlKind, data: ControlData) -> Self {
        let mut entry = Self {
            title: title.to_string(),
            kind,
            data,
            label: None,
            callback: None,
            enabled: true,
            visible: true,
            style: Style::default(),
            native: true,
        };
        entry.refresh_label();
        entry
    }

    pub(crate) fn with_callback(mut self, callback: Option<ValueCallback>) -> Self {
        self.callback = callback;
        self
    }

    pub(crate) fn with_native(mut self, native: bool) -> Self {
        self.native = native;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn data(&self) -> &ControlData {
        &self.data
    }

    /// Label text as currently displayed; buttons have none
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// False when a color/date/time control fell back to a plain text editor
    pub fn is_native(&self) -> bool {
        self.native
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Current value, typed by kind
    pub fn value(&self) -> ControlValue {
        match &self.data {
            ControlData::Numeric { value, .. } => ControlValue::Number(*value),
            ControlData::Boolean(b) => ControlValue::Bool(*b),
            ControlData::Button => ControlValue::Button(ButtonRef {
                title: self.title.clone(),
            }),
            ControlData::Text { value, .. } => ControlValue::Text(value.clone()),
            ControlData::Info(text) => ControlValue::Text(text.clone()),
            ControlData::DropDown { items, index } => match items.get(*index) {
                Some(item) => ControlValue::Selection(DropDownSelection {
                    index: *index,
                    label: item.label.clone(),
                    value: item.value.clone(),
                }),
                None => ControlValue::Empty,
            },
            ControlData::Image { source } => ControlValue::Text(source.clone()),
            ControlData::Progress { value, max, .. } => ControlValue::Progress {
                value: *value,
                max: *max,
            },
            ControlData::FileChooser { chosen, .. } => ControlValue::File(chosen.clone()),
            ControlData::Element(_) => ControlValue::Empty,
        }
    }

    /// Recompute the label from the current data
    pub(crate) fn refresh_label(&mut self) {
        self.label = match (&self.kind, &self.data) {
            (ControlKind::Button, _) => None,
            (_, ControlData::Numeric { value, .. }) => {
                Some(format!("{}: {}", self.title, format_number(*value)))
            }
            (_, ControlData::Progress { value, max, display }) => Some(match display {
                ValueDisplay::Numbers => format!(
                    "{}: {} / {}",
                    self.title,
                    format_number(*value),
                    format_number(*max)
                ),
                ValueDisplay::Percent => {
                    let percent = if *max == 0.0 { 0.0 } else { value / max * 100.0 };
                    format!("{}: {}%", self.title, percent.round())
                }
                ValueDisplay::None => self.title.clone(),
            }),
            _ => Some(self.title.clone()),
        };
    }

    /// Invoke the entry's own callback
    pub(crate) fn fire(&mut self, value: &ControlValue) {
        if let Some(callback) = self.callback.as_mut() {
            callback(value);
        }
    }
}
