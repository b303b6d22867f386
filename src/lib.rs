// QuickSettings Library
// Draggable, collapsible settings panels for terminal user interfaces

// Core infrastructure - panel state, registry, layout, input
pub mod core;

// Controls - one add/get/set family per control kind
pub mod controls;

// Descriptors - declarative panel definitions
pub mod descriptor;

// Desktop - owns panels and routes input between them
pub mod desktop;

// UI - theme, rendering and the event loop
pub mod ui;

// Utilities - value formatting and accept filters
pub mod utilities;

// Re-export commonly used items for convenience
pub use core::{
    BindTarget, Capabilities, ControlKind, ControlValue, DropDownItem, DropDownSelection, DuplicatePolicy,
    Interaction, Panel, PanelElement, PanelError, PanelEvent, PanelResult, ValueDisplay,
};
pub use descriptor::{parse, CallbackScope, PanelDescriptor, ParseReport};
pub use desktop::{Desktop, PanelId};
