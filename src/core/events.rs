// Event Handling
// Panel event types and the handler that derives them from terminal input

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::{Duration, Instant};

use super::app_config::compiled;

/// Input events understood by panels and the desktop
/// Pointer coordinates are screen cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    PointerDown { column: i32, row: i32 },
    PointerMove { column: i32, row: i32 },
    PointerUp { column: i32, row: i32 },
    DoubleClick { column: i32, row: i32 },
    KeyDown { code: KeyCode, modifiers: KeyModifiers },
    KeyUp(KeyCode),
    Resize,
}

/// Converts crossterm events to panel events
/// Tracks the last click to synthesise double-clicks, and synthesises key-up events
/// for terminals that only report presses.
#[derive(Debug)]
pub struct EventHandler {
    double_click: Duration,
    last_click: Option<(Instant, u16, u16)>,
    reports_releases: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            double_click: Duration::from_millis(compiled::DOUBLE_CLICK_MS),
            last_click: None,
            reports_releases: false,
        }
    }

    /// Set the double-click window
    pub fn with_double_click(mut self, window: Duration) -> Self {
        self.double_click = window;
        self
    }

    /// Whether the terminal reports key releases itself
    pub fn with_release_events(mut self, reports_releases: bool) -> Self {
        self.reports_releases = reports_releases;
        self
    }

    /// Convert a crossterm event to zero or more panel events
    pub fn handle(&mut self, event: Event) -> Vec<PanelEvent> {
        self.handle_at(event, Instant::now())
    }

    /// Same as `handle` with an explicit clock, for deterministic tests
    pub fn handle_at(&mut self, event: Event, now: Instant) -> Vec<PanelEvent> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now).into_iter().collect(),
            Event::Resize(_, _) => vec![PanelEvent::Resize],
            _ => Vec::new(),
        }
    }

    /// Handle keyboard events
    fn handle_key(&self, key: KeyEvent) -> Vec<PanelEvent> {
        match key.kind {
            KeyEventKind::Press => {
                let down = PanelEvent::KeyDown {
                    code: key.code,
                    modifiers: key.modifiers,
                };
                if self.reports_releases {
                    vec![down]
                } else {
                    vec![down, PanelEvent::KeyUp(key.code)]
                }
            }
            KeyEventKind::Release => vec![PanelEvent::KeyUp(key.code)],
            // Key repeats would re-trigger toggles
            KeyEventKind::Repeat => Vec::new(),
        }
    }

    /// Handle mouse events
    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Option<PanelEvent> {
        let column = i32::from(mouse.column);
        let row = i32::from(mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let is_double = matches!(
                    self.last_click,
                    Some((at, c, r))
                        if c == mouse.column
                            && r == mouse.row
                            && now.duration_since(at) <= self.double_click
                );
                if is_double {
                    self.last_click = None;
                    Some(PanelEvent::DoubleClick { column, row })
                } else {
                    self.last_click = Some((now, mouse.column, mouse.row));
                    Some(PanelEvent::PointerDown { column, row })
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                Some(PanelEvent::PointerMove { column, row })
            }
            MouseEventKind::Up(MouseButton::Left) => Some(PanelEvent::PointerUp { column, row }),
            _ => None,
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
