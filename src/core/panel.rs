// Panel
// A draggable, collapsible settings panel that owns its control registry

use crossterm::event::KeyCode;
use ratatui::style::Style;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};

use super::app_config::{PanelDefaults, TITLE_BAR_HEIGHT};
use super::capabilities::Capabilities;
use super::control::{ControlData, ControlEntry, ControlKind, ControlValue, GlobalChangeHandler};
use super::error::{PanelError, PanelResult};
use super::layout::natural_content_height;
use super::registry::ControlRegistry;
use super::z_order::{GlobalZOrder, ZOrder};
use crate::controls::numeric::check_finite;

/// Drag state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    /// Pointer captured; `last` is the previous pointer position in screen cells
    Dragging { last: (i32, i32) },
}

/// What happens when a control is added under a title already in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Refuse the new control with `PanelError::DuplicateTitle`
    #[default]
    Reject,
    /// Drop the old control (with a warning) and register the new one in its place
    Replace,
}

/// Exported values, either as a JSON object or rendered to a string
#[derive(Debug, Clone, PartialEq)]
pub enum ValuesJson {
    Object(Map<String, JsonValue>),
    Text(String),
}

/// Text being edited in a text-like control
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditBuffer {
    pub title: String,
    pub text: String,
}

/// A settings panel
pub struct Panel {
    title: String,
    title_visible: bool,
    x: i32,
    y: i32,
    width: u16,
    /// Full visible height when set; auto-sized otherwise
    height: Option<u16>,
    hidden: bool,
    collapsed: bool,
    draggable: bool,
    collapsible: bool,
    snap_to_grid: bool,
    grid_size: u16,
    toggle_key: Option<KeyCode>,
    global_change: Option<GlobalChangeHandler>,
    z_index: u64,
    z_order: Rc<dyn ZOrder>,
    drag: DragState,
    duplicate_policy: DuplicatePolicy,
    capabilities: Capabilities,
    controls: ControlRegistry,
    pub(crate) focus: Option<String>,
    pub(crate) edit: Option<EditBuffer>,
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("title", &self.title)
            .field("position", &(self.x, self.y))
            .field("width", &self.width)
            .field("height", &self.height)
            .field("hidden", &self.hidden)
            .field("collapsed", &self.collapsed)
            .field("draggable", &self.draggable)
            .field("collapsible", &self.collapsible)
            .field("snap_to_grid", &self.snap_to_grid)
            .field("grid_size", &self.grid_size)
            .field("z_index", &self.z_index)
            .field("drag", &self.drag)
            .field("controls", &self.controls)
            .finish()
    }
}

impl Panel {
    // === Lifecycle ===

    /// Create a panel at `(x, y)`; `None` title uses the compiled default
    /// The first panel created in the process installs the default theme.
    pub fn create(x: i32, y: i32, title: Option<&str>) -> Self {
        crate::ui::styles::ensure_theme();

        let defaults = PanelDefaults::default();
        let z_order: Rc<dyn ZOrder> = Rc::new(GlobalZOrder);
        let z_index = z_order.raise();

        Self {
            title: title.map(str::to_string).unwrap_or(defaults.title),
            title_visible: true,
            x,
            y: y.max(0),
            width: defaults.width,
            height: None,
            hidden: false,
            collapsed: false,
            draggable: true,
            collapsible: true,
            snap_to_grid: false,
            grid_size: defaults.grid_size.max(1),
            toggle_key: None,
            global_change: None,
            z_index,
            z_order,
            drag: DragState::Idle,
            duplicate_policy: DuplicatePolicy::default(),
            capabilities: Capabilities::probe(),
            controls: ControlRegistry::new(),
            focus: None,
            edit: None,
        }
    }

    /// Use a different stacking counter (restacks the panel on it)
    pub fn with_z_order(mut self, z_order: Rc<dyn ZOrder>) -> Self {
        self.z_index = z_order.raise();
        self.z_order = z_order;
        self
    }

    /// Override the probed native-editor capabilities
    /// Only affects controls added afterwards.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Tear the panel down; consuming `self` makes later use impossible
    pub fn destroy(mut self) {
        debug!(title = %self.title, controls = self.controls.len(), "destroying panel");
        self.controls.clear();
        self.global_change = None;
    }

    // === Geometry ===

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Move the panel; y is clamped to be non-negative
    pub fn set_position(&mut self, x: i32, y: i32) -> &mut Self {
        self.x = x;
        self.y = y.max(0);
        self
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn set_width(&mut self, width: u16) -> &mut Self {
        self.width = width.max(1);
        self
    }

    /// Set the full visible height, title bar included
    pub fn set_height(&mut self, height: u16) -> &mut Self {
        self.height = Some(height.max(TITLE_BAR_HEIGHT));
        self
    }

    pub fn set_size(&mut self, width: u16, height: u16) -> &mut Self {
        self.set_width(width).set_height(height)
    }

    /// Return to content-sized height
    pub fn set_auto_height(&mut self) -> &mut Self {
        self.height = None;
        self
    }

    pub fn explicit_height(&self) -> Option<u16> {
        self.height
    }

    /// Visible height in rows
    pub fn height(&self) -> u16 {
        if self.collapsed {
            TITLE_BAR_HEIGHT
        } else {
            TITLE_BAR_HEIGHT.saturating_add(self.content_height())
        }
    }

    /// Height of the content area: explicit height minus the title bar, or the natural height
    pub fn content_height(&self) -> u16 {
        match self.height {
            Some(h) => h.saturating_sub(TITLE_BAR_HEIGHT),
            None => natural_content_height(self),
        }
    }

    /// Whether a screen cell falls inside the panel
    pub fn contains(&self, column: i32, row: i32) -> bool {
        !self.hidden
            && column >= self.x
            && column < self.x.saturating_add(i32::from(self.width))
            && row >= self.y
            && row < self.y.saturating_add(i32::from(self.height()))
    }

    // === Title ===

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn is_title_visible(&self) -> bool {
        self.title_visible
    }

    pub fn hide_title(&mut self) -> &mut Self {
        self.title_visible = false;
        self
    }

    pub fn show_title(&mut self) -> &mut Self {
        self.title_visible = true;
        self
    }

    // === Flags ===

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn set_draggable(&mut self, draggable: bool) -> &mut Self {
        self.draggable = draggable;
        if !draggable {
            self.drag = DragState::Idle;
        }
        self
    }

    pub fn is_collapsible(&self) -> bool {
        self.collapsible
    }

    pub fn set_collapsible(&mut self, collapsible: bool) -> &mut Self {
        self.collapsible = collapsible;
        self
    }

    pub fn snaps_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) -> &mut Self {
        self.snap_to_grid = snap;
        self
    }

    pub fn grid_size(&self) -> u16 {
        self.grid_size
    }

    pub fn set_grid_size(&mut self, size: u16) -> PanelResult<&mut Self> {
        if size == 0 {
            return Err(PanelError::InvalidGridSize);
        }
        self.grid_size = size;
        Ok(self)
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    pub fn set_duplicate_policy(&mut self, policy: DuplicatePolicy) -> &mut Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    // === Stacking ===

    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    /// Raise above every panel sharing the same counter
    pub fn raise(&mut self) -> &mut Self {
        self.z_index = self.z_order.raise();
        self
    }

    // === Collapse / visibility ===

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Detach the content area; controls keep their state
    pub fn collapse(&mut self) -> &mut Self {
        if !self.collapsed {
            debug!(title = %self.title, "collapse");
            self.collapsed = true;
            self.edit = None;
        }
        self
    }

    /// Reattach the content area
    pub fn expand(&mut self) -> &mut Self {
        if self.collapsed {
            debug!(title = %self.title, "expand");
            self.collapsed = false;
        }
        self
    }

    pub fn toggle_collapsed(&mut self) -> &mut Self {
        if self.collapsed {
            self.expand()
        } else {
            self.collapse()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Show the panel and raise it
    pub fn show(&mut self) -> &mut Self {
        debug!(title = %self.title, "show");
        self.hidden = false;
        self.raise()
    }

    pub fn hide(&mut self) -> &mut Self {
        debug!(title = %self.title, "hide");
        self.hidden = true;
        self.drag = DragState::Idle;
        self.edit = None;
        self
    }

    pub fn toggle_visibility(&mut self) -> &mut Self {
        if self.hidden {
            self.show()
        } else {
            self.hide()
        }
    }

    /// Bind the key that toggles visibility on key-up; a later call replaces it
    pub fn set_key(&mut self, code: KeyCode) -> &mut Self {
        self.toggle_key = Some(code);
        self
    }

    pub fn toggle_key(&self) -> Option<KeyCode> {
        self.toggle_key
    }

    /// Key-up handler; returns true when the bound key toggled visibility
    pub fn key_up(&mut self, code: KeyCode) -> bool {
        if self.toggle_key == Some(code) {
            self.toggle_visibility();
            true
        } else {
            false
        }
    }

    // === Drag ===

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Idle -> Dragging; captures the pointer and raises the panel
    pub fn begin_drag(&mut self, column: i32, row: i32) -> bool {
        if !self.draggable || self.hidden || self.is_dragging() {
            return false;
        }
        self.drag = DragState::Dragging { last: (column, row) };
        self.raise();
        debug!(title = %self.title, column, row, "drag start");
        true
    }

    /// Dragging -> Dragging; moves by the pointer delta
    pub fn drag_to(&mut self, column: i32, row: i32) {
        if let DragState::Dragging { last } = self.drag {
            self.x = self.x.saturating_add(column.saturating_sub(last.0));
            // the title bar must stay reachable
            self.y = self.y.saturating_add(row.saturating_sub(last.1)).max(0);
            self.drag = DragState::Dragging { last: (column, row) };
        }
    }

    /// Dragging -> Idle; snaps to the grid when enabled
    pub fn end_drag(&mut self) {
        if !self.is_dragging() {
            return;
        }
        if self.snap_to_grid {
            self.x = snap(self.x, self.grid_size);
            self.y = snap(self.y, self.grid_size).max(0);
        }
        self.drag = DragState::Idle;
        debug!(title = %self.title, x = self.x, y = self.y, "drag end");
    }

    // === Change notification ===

    /// Set the handler called after every control's own callback
    pub fn set_global_change_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&str, &ControlValue) + 'static,
    {
        self.global_change = Some(Box::new(handler));
        self
    }

    pub fn clear_global_change_handler(&mut self) -> &mut Self {
        self.global_change = None;
        self
    }

    /// Fire the control's callback, then the global handler
    pub(crate) fn notify(&mut self, title: &str) {
        let Some(entry) = self.controls.get_mut(title) else {
            return;
        };
        let value = entry.value();
        entry.fire(&value);
        if let Some(handler) = self.global_change.as_mut() {
            handler(title, &value);
        }
    }

    // === Registry ===

    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    pub fn has_control(&self, title: &str) -> bool {
        self.controls.contains(title)
    }

    /// Titles in display order
    pub fn control_titles(&self) -> &[String] {
        self.controls.titles()
    }

    pub fn control(&self, title: &str) -> PanelResult<&ControlEntry> {
        self.controls
            .get(title)
            .ok_or_else(|| PanelError::ControlNotFound(title.to_string()))
    }

    pub(crate) fn control_mut(&mut self, title: &str) -> PanelResult<&mut ControlEntry> {
        self.controls
            .get_mut(title)
            .ok_or_else(|| PanelError::ControlNotFound(title.to_string()))
    }

    /// Look up a control and check it is one of `kinds`
    pub(crate) fn control_of(&self, title: &str, kinds: &[ControlKind]) -> PanelResult<&ControlEntry> {
        let entry = self.control(title)?;
        check_kind(entry, kinds)?;
        Ok(entry)
    }

    pub(crate) fn control_of_mut(
        &mut self,
        title: &str,
        kinds: &[ControlKind],
    ) -> PanelResult<&mut ControlEntry> {
        let entry = self.control_mut(title)?;
        check_kind(entry, kinds)?;
        Ok(entry)
    }

    /// Store a new entry, applying the duplicate policy
    pub(crate) fn register(&mut self, entry: ControlEntry) -> PanelResult<&mut Self> {
        let title = entry.title().to_string();
        if self.controls.contains(&title) {
            match self.duplicate_policy {
                DuplicatePolicy::Reject => return Err(PanelError::DuplicateTitle(title)),
                DuplicatePolicy::Replace => {
                    warn!(%title, "replacing control with duplicate title");
                    self.forget_focus(&title);
                }
            }
        }
        self.controls.insert(entry);
        Ok(self)
    }

    /// Whether a native editor is used for `kind` on this panel
    pub(crate) fn honors(&self, kind: ControlKind) -> bool {
        self.capabilities.honors(kind)
    }

    fn forget_focus(&mut self, title: &str) {
        if self.focus.as_deref() == Some(title) {
            self.focus = None;
        }
        if self.edit.as_ref().is_some_and(|e| e.title == title) {
            self.edit = None;
        }
    }

    /// Detach a control and drop it
    pub fn remove_control(&mut self, title: &str) -> PanelResult<&mut Self> {
        self.controls
            .remove(title)
            .ok_or_else(|| PanelError::ControlNotFound(title.to_string()))?;
        self.forget_focus(title);
        Ok(self)
    }

    pub fn enable_control(&mut self, title: &str) -> PanelResult<&mut Self> {
        self.control_mut(title)?.enabled = true;
        Ok(self)
    }

    /// Disabled controls ignore pointer and keyboard input; setters still apply
    pub fn disable_control(&mut self, title: &str) -> PanelResult<&mut Self> {
        self.control_mut(title)?.enabled = false;
        if self.edit.as_ref().is_some_and(|e| e.title == title) {
            self.edit = None;
        }
        Ok(self)
    }

    pub fn show_control(&mut self, title: &str) -> PanelResult<&mut Self> {
        self.control_mut(title)?.visible = true;
        Ok(self)
    }

    pub fn hide_control(&mut self, title: &str) -> PanelResult<&mut Self> {
        self.control_mut(title)?.visible = false;
        self.forget_focus(title);
        Ok(self)
    }

    /// Patch the control's style over the theme
    pub fn override_style(&mut self, title: &str, style: Style) -> PanelResult<&mut Self> {
        let entry = self.control_mut(title)?;
        entry.style = entry.style.patch(style);
        Ok(self)
    }

    /// Drop every style override on a control
    pub fn reset_style(&mut self, title: &str) -> PanelResult<&mut Self> {
        self.control_mut(title)?.style = Style::default();
        Ok(self)
    }

    // === Generic values ===

    /// Current value of any control
    pub fn get_value(&self, title: &str) -> PanelResult<ControlValue> {
        Ok(self.control(title)?.value())
    }

    /// Set any control from a typed value, firing its callbacks
    pub fn set_value(&mut self, title: &str, value: ControlValue) -> PanelResult<&mut Self> {
        let kind = self.control(title)?.kind();
        let mismatch = || PanelError::invalid_value(title, format!("{:?} does not fit a {} control", value, kind));

        match (kind, &value) {
            (ControlKind::Range, ControlValue::Number(n)) => self.set_range_value(title, *n),
            (ControlKind::Number, ControlValue::Number(n)) => self.set_number_value(title, *n),
            (ControlKind::Boolean, ControlValue::Bool(b)) => self.set_boolean(title, *b),
            (ControlKind::Color, ControlValue::Text(s)) => self.set_color(title, s),
            (ControlKind::Text, ControlValue::Text(s)) => self.set_text(title, s),
            (ControlKind::Password, ControlValue::Text(s)) => self.set_password(title, s),
            (ControlKind::TextArea, ControlValue::Text(s)) => self.set_text_area(title, s),
            (ControlKind::Date, ControlValue::Text(s)) => self.set_date(title, s),
            (ControlKind::Time, ControlValue::Text(s)) => self.set_time(title, s),
            (ControlKind::Info, ControlValue::Text(s)) => self.set_info(title, s),
            (ControlKind::Image, ControlValue::Text(s)) => self.set_image_source(title, s),
            (ControlKind::DropDown, ControlValue::Selection(sel)) => self.set_drop_down_index(title, sel.index),
            (ControlKind::DropDown, ControlValue::Text(label)) => self.set_drop_down_value(title, label),
            (ControlKind::ProgressBar, ControlValue::Progress { value, max }) => {
                self.set_progress(title, *value, Some(*max))
            }
            (ControlKind::ProgressBar, ControlValue::Number(n)) => self.set_progress(title, *n, None),
            (ControlKind::FileChooser, ControlValue::File(Some(path))) => self.choose_file(title, path),
            (ControlKind::Button, ControlValue::Button(_)) => self.press_button(title),
            _ => Err(mismatch()),
        }
    }

    // === Serialization ===

    /// Title -> current value for every valued control
    pub fn values_as_json(&self) -> Map<String, JsonValue> {
        self.controls
            .iter()
            .filter(|entry| entry.kind().is_valued())
            .filter_map(|entry| entry.value().to_json().map(|v| (entry.title().to_string(), v)))
            .collect()
    }

    /// Export values as an object, or as a JSON string when `as_string`
    pub fn get_values_as_json(&self, as_string: bool) -> PanelResult<ValuesJson> {
        let values = self.values_as_json();
        if as_string {
            let text = serde_json::to_string(&values).map_err(|e| PanelError::Parse {
                what: "values",
                message: e.to_string(),
            })?;
            Ok(ValuesJson::Text(text))
        } else {
            Ok(ValuesJson::Object(values))
        }
    }

    /// Whether `set_value` would accept `value`; nothing changes and nothing fires
    pub fn check_value(&self, title: &str, value: &ControlValue) -> PanelResult<()> {
        let kind = self.control(title)?.kind();
        match (kind, value) {
            (ControlKind::Range | ControlKind::Number, ControlValue::Number(n)) => check_finite(title, *n),
            (ControlKind::Color, ControlValue::Text(s)) => self.color_input(title, s).map(drop),
            (ControlKind::Date | ControlKind::Time, ControlValue::Text(s)) => {
                self.temporal_input(kind, title, s).map(drop)
            }
            (ControlKind::DropDown, ControlValue::Selection(sel)) => self.check_drop_down_index(title, sel.index),
            (ControlKind::DropDown, ControlValue::Text(label)) => self.drop_down_index_of(title, label).map(drop),
            (ControlKind::FileChooser, ControlValue::File(Some(path))) => self.check_accepts(title, path),
            (ControlKind::Boolean, ControlValue::Bool(_))
            | (
                ControlKind::Text | ControlKind::Password | ControlKind::TextArea | ControlKind::Info | ControlKind::Image,
                ControlValue::Text(_),
            )
            | (ControlKind::ProgressBar, ControlValue::Progress { .. } | ControlValue::Number(_))
            | (ControlKind::Button, ControlValue::Button(_)) => Ok(()),
            _ => Err(PanelError::invalid_value(
                title,
                format!("{:?} does not fit a {} control", value, kind),
            )),
        }
    }

    /// Apply a JSON object of title -> value; unknown titles are skipped.
    /// Every value is checked first, so an error leaves the panel untouched and fires nothing.
    pub fn set_values_from_json(&mut self, values: &Map<String, JsonValue>) -> PanelResult<&mut Self> {
        let mut pending = Vec::with_capacity(values.len());
        for (title, json) in values {
            let Some(entry) = self.controls.get(title) else {
                debug!(%title, "skipping value for unknown control");
                continue;
            };
            let value = json_to_value(entry, json)
                .ok_or_else(|| PanelError::invalid_value(title, format!("cannot apply {}", json)))?;
            self.check_value(title, &value)?;
            pending.push((title, value));
        }
        for (title, value) in pending {
            self.set_value(title, value)?;
        }
        Ok(self)
    }

    /// Parse a JSON string and apply it with `set_values_from_json`
    pub fn set_values_from_json_str(&mut self, json: &str) -> PanelResult<&mut Self> {
        let values: Map<String, JsonValue> = serde_json::from_str(json).map_err(|e| PanelError::Parse {
            what: "values",
            message: e.to_string(),
        })?;
        self.set_values_from_json(&values)
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::create(0, 0, None)
    }
}

fn check_kind(entry: &ControlEntry, kinds: &[ControlKind]) -> PanelResult<()> {
    if kinds.contains(&entry.kind()) {
        Ok(())
    } else {
        Err(PanelError::KindMismatch {
            title: entry.title().to_string(),
            expected: kinds[0],
            found: entry.kind(),
        })
    }
}

/// Nearest multiple of `grid`; halves round up
fn snap(value: i32, grid: u16) -> i32 {
    let grid = f64::from(grid.max(1));
    ((f64::from(value) / grid + 0.5).floor() * grid) as i32
}

/// Convert an exported JSON value back into a control value
fn json_to_value(entry: &ControlEntry, json: &JsonValue) -> Option<ControlValue> {
    match (&entry.data, json) {
        (ControlData::Numeric { .. }, JsonValue::Number(n)) => n.as_f64().map(ControlValue::Number),
        (ControlData::Boolean(_), JsonValue::Bool(b)) => Some(ControlValue::Bool(*b)),
        (ControlData::Text { .. }, JsonValue::String(s)) => Some(ControlValue::Text(s.clone())),
        (ControlData::DropDown { .. }, JsonValue::String(s)) => Some(ControlValue::Text(s.clone())),
        (ControlData::FileChooser { .. }, JsonValue::String(s)) => {
            Some(ControlValue::File(Some(PathBuf::from(s))))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::z_order::LocalZOrder;
    use std::cell::RefCell;

    fn panel() -> Panel {
        Panel::create(10, 5, Some("Test"))
            .with_z_order(Rc::new(LocalZOrder::new()))
            .with_capabilities(Capabilities::all())
    }

    #[test]
    fn test_create_defaults() {
        let p = Panel::create(0, 0, None);
        assert_eq!(p.position(), (0, 0));
        assert_eq!(p.title(), PanelDefaults::default().title);
        assert!(p.is_draggable());
        assert!(p.is_collapsible());
        assert!(!p.is_collapsed());
        assert!(!p.is_hidden());
        assert!(p.controls().is_empty());
    }

    #[test]
    fn test_set_position_clamps_y_only() {
        let mut p = panel();
        p.set_position(-7, -3);
        assert_eq!(p.position(), (-7, 0));
    }

    #[test]
    fn test_set_height_includes_title_bar() {
        let mut p = panel();
        p.set_size(30, 12);
        assert_eq!(p.width(), 30);
        assert_eq!(p.content_height(), 12 - TITLE_BAR_HEIGHT);
        assert_eq!(p.height(), 12);
    }

    #[test]
    fn test_drag_moves_by_pointer_delta() {
        let mut p = panel();
        assert!(p.begin_drag(12, 5));
        p.drag_to(15, 7);
        p.drag_to(20, 9);
        p.end_drag();
        assert_eq!(p.position(), (10 + 8, 5 + 4));
        assert_eq!(p.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_geometry_saturates_at_the_edge_of_i32() {
        let mut p = panel();
        p.set_position(i32::MAX - 2, 0);
        assert!(p.contains(i32::MAX - 1, 0));
        assert!(!p.contains(i32::MAX - 3, 0));

        assert!(p.begin_drag(i32::MIN, 0));
        p.drag_to(i32::MAX, i32::MAX);
        p.end_drag();
        assert_eq!(p.position(), (i32::MAX, i32::MAX));
    }

    #[test]
    fn test_drag_snaps_only_at_release() {
        let mut p = panel();
        p.set_snap_to_grid(true);
        p.set_grid_size(10).unwrap();
        p.set_position(0, 0);

        p.begin_drag(0, 0);
        p.drag_to(14, 26);
        assert_eq!(p.position(), (14, 26));
        p.end_drag();
        assert_eq!(p.position(), (10, 30));
    }

    #[test]
    fn test_snap_rounds_halves_up() {
        assert_eq!(snap(15, 10), 20);
        assert_eq!(snap(14, 10), 10);
        assert_eq!(snap(-15, 10), -10);
        assert_eq!(snap(-16, 10), -20);
    }

    #[test]
    fn test_drag_requires_draggable() {
        let mut p = panel();
        p.set_draggable(false);
        assert!(!p.begin_drag(10, 5));
        p.drag_to(20, 20);
        assert_eq!(p.position(), (10, 5));
    }

    #[test]
    fn test_drag_start_raises() {
        let counter = Rc::new(LocalZOrder::new());
        let mut a = Panel::create(0, 0, Some("A")).with_z_order(counter.clone());
        let b = Panel::create(0, 0, Some("B")).with_z_order(counter.clone());
        assert!(b.z_index() > a.z_index());

        a.begin_drag(1, 0);
        assert!(a.z_index() > b.z_index());
    }

    #[test]
    fn test_grid_size_must_be_positive() {
        let mut p = panel();
        assert!(matches!(p.set_grid_size(0), Err(PanelError::InvalidGridSize)));
    }

    #[test]
    fn test_collapse_keeps_controls() {
        let mut p = panel();
        p.add_range("Speed", 0.0, 10.0, 5.0, 1.0, |_| {}).unwrap();
        p.set_range_value("Speed", 8.0).unwrap();

        p.collapse();
        assert!(p.is_collapsed());
        assert_eq!(p.height(), TITLE_BAR_HEIGHT);

        p.expand();
        assert!(!p.is_collapsed());
        assert_eq!(p.get_range_value("Speed").unwrap(), 8.0);
        assert_eq!(p.control_titles(), &["Speed".to_string()]);
    }

    #[test]
    fn test_visibility_toggle_and_key() {
        let mut p = panel();
        p.set_key(KeyCode::Char('h'));
        assert!(p.key_up(KeyCode::Char('h')));
        assert!(p.is_hidden());
        assert!(!p.key_up(KeyCode::Char('x')));
        assert!(p.key_up(KeyCode::Char('h')));
        assert!(!p.is_hidden());

        // last binding wins
        p.set_key(KeyCode::F(1));
        assert!(!p.key_up(KeyCode::Char('h')));
        assert!(p.key_up(KeyCode::F(1)));
    }

    #[test]
    fn test_show_raises() {
        let mut p = panel();
        let before = p.z_index();
        p.hide();
        p.show();
        assert!(p.z_index() > before);
    }

    #[test]
    fn test_missing_control_errors() {
        let mut p = panel();
        assert!(matches!(p.get_value("Nope"), Err(PanelError::ControlNotFound(_))));
        assert!(matches!(p.enable_control("Nope"), Err(PanelError::ControlNotFound(_))));
        assert!(matches!(p.disable_control("Nope"), Err(PanelError::ControlNotFound(_))));
        assert!(matches!(p.show_control("Nope"), Err(PanelError::ControlNotFound(_))));
        assert!(matches!(p.hide_control("Nope"), Err(PanelError::ControlNotFound(_))));
        assert!(matches!(p.remove_control("Nope"), Err(PanelError::ControlNotFound(_))));
    }

    #[test]
    fn test_duplicate_policy() {
        let mut p = panel();
        p.add_boolean("Flag", true, |_| {}).unwrap();
        assert!(matches!(
            p.add_boolean("Flag", false, |_| {}),
            Err(PanelError::DuplicateTitle(_))
        ));
        assert!(p.get_boolean("Flag").unwrap());

        p.set_duplicate_policy(DuplicatePolicy::Replace);
        p.add_text("Flag", "now text", |_| {}).unwrap();
        assert_eq!(p.control("Flag").unwrap().kind(), ControlKind::Text);
        assert_eq!(p.controls().len(), 1);
    }

    #[test]
    fn test_global_handler_runs_after_control_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut p = panel();

        let control_log = log.clone();
        p.add_boolean("Flag", false, move |v| control_log.borrow_mut().push(format!("control {}", v)))
            .unwrap();
        let global_log = log.clone();
        p.set_global_change_handler(move |title, _| global_log.borrow_mut().push(format!("global {}", title)));

        p.set_boolean("Flag", true).unwrap();
        assert_eq!(*log.borrow(), vec!["control true".to_string(), "global Flag".to_string()]);
    }

    #[test]
    fn test_values_round_trip_through_json() {
        let mut p = panel();
        p.add_range("Speed", 0.0, 10.0, 5.0, 1.0, |_| {}).unwrap();
        p.add_boolean("On", true, |_| {}).unwrap();
        p.add_text("Name", "abc", |_| {}).unwrap();
        p.add_button("Go", |_| {}).unwrap();

        let exported = p.values_as_json();
        assert_eq!(exported.len(), 3);
        assert_eq!(exported["Speed"], serde_json::json!(5.0));

        let mut other = panel();
        other.add_range("Speed", 0.0, 10.0, 0.0, 1.0, |_| {}).unwrap();
        other.add_boolean("On", false, |_| {}).unwrap();
        other.add_text("Name", "", |_| {}).unwrap();
        other.set_values_from_json(&exported).unwrap();
        assert_eq!(other.values_as_json(), exported);
    }

    #[test]
    fn test_rejected_values_leave_the_panel_untouched() {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let mut p = panel();
        for title in ["A", "B"] {
            let sink = fired.clone();
            p.add_boolean(title, false, move |v| sink.borrow_mut().push(v)).unwrap();
        }
        let sink = fired.clone();
        p.add_color("Tint", "#000000", move |_| sink.borrow_mut().push(true)).unwrap();
        fired.borrow_mut().clear();

        let wrong_type = serde_json::json!({"A": true, "B": "oops"});
        assert!(matches!(
            p.set_values_from_json(wrong_type.as_object().unwrap()),
            Err(PanelError::InvalidValue { .. })
        ));
        let bad_color = serde_json::json!({"A": true, "Tint": "not a color"});
        assert!(p.set_values_from_json(bad_color.as_object().unwrap()).is_err());

        assert!(!p.get_boolean("A").unwrap());
        assert_eq!(p.get_color("Tint").unwrap(), "#000000");
        assert!(fired.borrow().is_empty());

        let valid = serde_json::json!({"A": true, "Tint": "#fff", "Gone": 1});
        p.set_values_from_json(valid.as_object().unwrap()).unwrap();
        assert!(p.get_boolean("A").unwrap());
        assert_eq!(p.get_color("Tint").unwrap(), "#ffffff");
        assert_eq!(fired.borrow().len(), 2);
    }

    #[test]
    fn test_values_as_string() {
        let mut p = panel();
        p.add_boolean("Enabled", true, |_| {}).unwrap();
        match p.get_values_as_json(true).unwrap() {
            ValuesJson::Text(text) => assert_eq!(text, r#"{"Enabled":true}"#),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_set_value_kind_mismatch() {
        let mut p = panel();
        p.add_boolean("On", true, |_| {}).unwrap();
        assert!(matches!(
            p.set_value("On", ControlValue::Number(1.0)),
            Err(PanelError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_override_style_patches() {
        use ratatui::style::{Color, Modifier};
        let mut p = panel();
        p.add_boolean("On", true, |_| {}).unwrap();
        p.override_style("On", Style::default().fg(Color::Red)).unwrap();
        p.override_style("On", Style::default().add_modifier(Modifier::BOLD)).unwrap();
        let style = p.control("On").unwrap().style();
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
