// Core infrastructure module
// Panel state, the control registry and the systems every control builds on

pub mod app_config;
pub mod bind;
pub mod capabilities;
pub mod control;
pub mod error;
pub mod events;
pub mod interaction;
pub mod layout;
pub mod panel;
pub mod registry;
pub mod z_order;

pub use app_config::PanelDefaults;
pub use bind::BindTarget;
pub use capabilities::Capabilities;
pub use control::{
    ButtonRef, ControlData, ControlEntry, ControlKind, ControlValue, DropDownItem, DropDownSelection,
    GlobalChangeHandler, PanelElement, ValueCallback, ValueDisplay,
};
pub use error::{PanelError, PanelResult};
pub use events::{EventHandler, PanelEvent};
pub use interaction::Interaction;
pub use layout::{ControlSlot, Hit, PanelLayout};
pub use panel::{DragState, DuplicatePolicy, Panel, ValuesJson};
pub use registry::ControlRegistry;
pub use z_order::{GlobalZOrder, LocalZOrder, ZOrder};
