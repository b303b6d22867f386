// Desktop
// Parent container that owns panels, stacks them and routes input to them

use serde_json::{Map, Value as JsonValue};
use std::rc::Rc;
use tracing::debug;

use crate::core::{Capabilities, GlobalZOrder, Interaction, Panel, PanelEvent, PanelResult, ZOrder};
use crate::descriptor::{CallbackScope, PanelDescriptor, ParseReport};

/// Handle to a panel owned by a desktop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u64);

/// Owns every panel on screen
/// Pointer events go to the topmost panel under the pointer; while a panel is
/// dragging it captures all pointer events until release.
pub struct Desktop {
    panels: Vec<(PanelId, Panel)>,
    z_order: Rc<dyn ZOrder>,
    capabilities: Option<Capabilities>,
    next_id: u64,
    capture: Option<PanelId>,
    active: Option<PanelId>,
}

impl Desktop {
    /// Desktop stacking on the process-wide counter
    pub fn new() -> Self {
        Self::with_z_order(Rc::new(GlobalZOrder))
    }

    pub fn with_z_order(z_order: Rc<dyn ZOrder>) -> Self {
        Self {
            panels: Vec::new(),
            z_order,
            capabilities: None,
            next_id: 0,
            capture: None,
            active: None,
        }
    }

    /// Capabilities handed to every panel created from now on
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    // === Lifecycle ===

    pub fn create_panel(&mut self, x: i32, y: i32, title: Option<&str>) -> PanelId {
        let panel = Panel::create(x, y, title);
        self.attach(panel)
    }

    /// Take ownership of a panel, restacking it on this desktop's counter
    pub fn attach(&mut self, panel: Panel) -> PanelId {
        let mut panel = panel.with_z_order(self.z_order.clone());
        if let Some(capabilities) = self.capabilities {
            panel = panel.with_capabilities(capabilities);
        }
        self.next_id += 1;
        let id = PanelId(self.next_id);
        debug!(?id, title = %panel.title(), "panel attached");
        self.panels.push((id, panel));
        self.active = Some(id);
        id
    }

    /// Build a panel from descriptor text and attach it
    pub fn parse(&mut self, source: &str, scope: &CallbackScope) -> PanelResult<(PanelId, ParseReport)> {
        let descriptor: PanelDescriptor = source.parse()?;
        self.build(&descriptor, scope)
    }

    /// Attach a panel built from an already parsed descriptor
    pub fn build(&mut self, descriptor: &PanelDescriptor, scope: &CallbackScope) -> PanelResult<(PanelId, ParseReport)> {
        let mut panel = Panel::create(descriptor.x, descriptor.y, descriptor.title.as_deref());
        if let Some(capabilities) = self.capabilities {
            panel = panel.with_capabilities(capabilities);
        }
        let report = descriptor.apply(&mut panel, scope)?;
        Ok((self.attach(panel), report))
    }

    /// Detach and destroy a panel; false when the id is unknown
    pub fn destroy(&mut self, id: PanelId) -> bool {
        let Some(position) = self.panels.iter().position(|(pid, _)| *pid == id) else {
            return false;
        };
        let (_, panel) = self.panels.remove(position);
        panel.destroy();
        if self.capture == Some(id) {
            self.capture = None;
        }
        if self.active == Some(id) {
            self.active = self.stacking().last().copied();
        }
        true
    }

    // === Access ===

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.iter().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    /// First panel with the given title
    pub fn find(&self, title: &str) -> Option<PanelId> {
        self.panels.iter().find(|(_, p)| p.title() == title).map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panel receiving keyboard input
    pub fn active(&self) -> Option<PanelId> {
        self.active
    }

    pub fn activate(&mut self, id: PanelId) -> bool {
        let known = self.panel(id).is_some();
        if known {
            self.active = Some(id);
        }
        known
    }

    /// Panel holding the pointer during a drag
    pub fn captured(&self) -> Option<PanelId> {
        self.capture
    }

    /// Ids from bottom to top of the stack
    pub fn stacking(&self) -> Vec<PanelId> {
        let mut order: Vec<(u64, PanelId)> = self.panels.iter().map(|(id, p)| (p.z_index(), *id)).collect();
        order.sort();
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Panels from bottom to top, for painting
    pub fn panels_bottom_to_top(&self) -> Vec<&Panel> {
        self.stacking().into_iter().filter_map(|id| self.panel(id)).collect()
    }

    /// Topmost visible panel containing a screen cell
    pub fn panel_at(&self, column: i32, row: i32) -> Option<PanelId> {
        self.stacking()
            .into_iter()
            .rev()
            .find(|id| self.panel(*id).is_some_and(|p| p.contains(column, row)))
    }

    /// Values of every panel, keyed by panel title in creation order.
    /// A repeated title gets a ` (2)`, ` (3)`, ... suffix so no panel is lost.
    pub fn values_as_json(&self) -> Map<String, JsonValue> {
        let mut values = Map::new();
        for (_, panel) in &self.panels {
            let mut key = panel.title().to_string();
            let mut n = 2;
            while values.contains_key(&key) {
                key = format!("{} ({})", panel.title(), n);
                n += 1;
            }
            values.insert(key, JsonValue::Object(panel.values_as_json()));
        }
        values
    }

    // === Input routing ===

    /// Route one event; returns what the receiving panel did with it
    pub fn dispatch(&mut self, event: &PanelEvent) -> Interaction {
        match *event {
            PanelEvent::PointerDown { column, row } | PanelEvent::DoubleClick { column, row } => {
                self.release_capture(column, row);
                let Some(id) = self.panel_at(column, row) else {
                    return Interaction::Ignored;
                };
                self.active = Some(id);
                let double = matches!(event, PanelEvent::DoubleClick { .. });
                let Some(panel) = self.panel_mut(id) else {
                    return Interaction::Ignored;
                };
                let outcome = if double {
                    panel.double_click(column, row)
                } else {
                    panel.pointer_down(column, row)
                };
                if panel.is_dragging() {
                    self.capture = Some(id);
                }
                outcome
            }
            PanelEvent::PointerMove { column, row } => match self.capture.and_then(|id| self.panel_mut(id)) {
                Some(panel) => panel.pointer_move(column, row),
                None => Interaction::Ignored,
            },
            PanelEvent::PointerUp { column, row } => {
                if self.capture.is_some() {
                    self.release_capture(column, row);
                    Interaction::Handled
                } else {
                    Interaction::Ignored
                }
            }
            PanelEvent::KeyDown { code, modifiers } => match self.active.and_then(|id| self.panel_mut(id)) {
                Some(panel) => panel.key_down(code, modifiers),
                None => Interaction::Ignored,
            },
            PanelEvent::KeyUp(code) => {
                // every panel sees key-ups; each checks its own toggle key
                let mut toggled = false;
                for (_, panel) in self.panels.iter_mut() {
                    toggled |= panel.key_up(code);
                }
                if toggled {
                    Interaction::Handled
                } else {
                    Interaction::Ignored
                }
            }
            PanelEvent::Resize => Interaction::Handled,
        }
    }

    /// End any drag in progress
    fn release_capture(&mut self, column: i32, row: i32) {
        if let Some(id) = self.capture.take() {
            if let Some(panel) = self.panel_mut(id) {
                panel.pointer_up(column, row);
            }
        }
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}
