// Controls module
// One add/get/set(/bind) family per control kind, implemented on `Panel`

pub mod boolean;
pub mod button;
pub mod color;
pub mod datetime;
pub mod dropdown;
pub mod element;
pub mod file_chooser;
pub mod image;
pub mod info;
pub mod numeric;
pub mod progress;
pub mod text;

use std::path::Path;

use crate::core::{ButtonRef, ControlValue, DropDownSelection, ValueCallback};

// Typed callback adapters: user closures take the kind's natural value type,
// the registry stores them behind the common `ValueCallback` form.

pub(crate) fn number_callback<F>(mut callback: F) -> ValueCallback
where
    F: FnMut(f64) + 'static,
{
    Box::new(move |value: &ControlValue| {
        if let Some(n) = value.as_f64() {
            callback(n);
        }
    })
}

pub(crate) fn bool_callback<F>(mut callback: F) -> ValueCallback
where
    F: FnMut(bool) + 'static,
{
    Box::new(move |value: &ControlValue| {
        if let Some(b) = value.as_bool() {
            callback(b);
        }
    })
}

pub(crate) fn text_callback<F>(mut callback: F) -> ValueCallback
where
    F: FnMut(&str) + 'static,
{
    Box::new(move |value: &ControlValue| {
        if let ControlValue::Text(text) = value {
            callback(text);
        }
    })
}

pub(crate) fn selection_callback<F>(mut callback: F) -> ValueCallback
where
    F: FnMut(&DropDownSelection) + 'static,
{
    Box::new(move |value: &ControlValue| {
        if let ControlValue::Selection(selection) = value {
            callback(selection);
        }
    })
}

pub(crate) fn file_callback<F>(mut callback: F) -> ValueCallback
where
    F: FnMut(&Path) + 'static,
{
    Box::new(move |value: &ControlValue| {
        if let ControlValue::File(Some(path)) = value {
            callback(path);
        }
    })
}

pub(crate) fn button_callback<F>(mut callback: F) -> ValueCallback
where
    F: FnMut(&ButtonRef) + 'static,
{
    Box::new(move |value: &ControlValue| {
        if let ControlValue::Button(button) = value {
            callback(button);
        }
    })
}
