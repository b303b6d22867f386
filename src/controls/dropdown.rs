// Dropdown Control
// Single selection from an ordered list of labelled items

use std::cell::RefCell;
use std::rc::Rc;

use super::selection_callback;
use crate::core::bind::bind_callback;
use crate::core::{
    BindTarget, ControlData, ControlEntry, ControlKind, DropDownItem, DropDownSelection, Panel, PanelError,
    PanelResult, ValueCallback,
};

const DROPDOWN: &[ControlKind] = &[ControlKind::DropDown];

impl Panel {
    pub(crate) fn insert_drop_down(
        &mut self,
        title: &str,
        items: Vec<DropDownItem>,
        index: usize,
        callback: Option<ValueCallback>,
    ) -> PanelResult<&mut Self> {
        if !items.is_empty() && index >= items.len() {
            return Err(PanelError::invalid_value(
                title,
                format!("index {} is out of range for {} items", index, items.len()),
            ));
        }
        let entry = ControlEntry::new(title, ControlKind::DropDown, ControlData::DropDown { items, index })
            .with_callback(callback);
        self.register(entry)
    }

    /// Add a dropdown; items convert from plain strings or `DropDownItem`
    pub fn add_drop_down<I, F>(&mut self, title: &str, items: I, callback: F) -> PanelResult<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<DropDownItem>,
        F: FnMut(&DropDownSelection) + 'static,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.insert_drop_down(title, items, 0, Some(selection_callback(callback)))
    }

    pub fn bind_drop_down<I, T>(&mut self, title: &str, items: I, target: Rc<RefCell<T>>) -> PanelResult<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<DropDownItem>,
        T: BindTarget + 'static,
    {
        let items = items.into_iter().map(Into::into).collect();
        let callback = bind_callback(title, target);
        self.insert_drop_down(title, items, 0, Some(callback))
    }

    /// The selected item, or `None` for an empty list
    pub fn get_drop_down_value(&self, title: &str) -> PanelResult<Option<DropDownSelection>> {
        let (items, index) = self.drop_down_data(title)?;
        Ok(items.get(index).map(|item| DropDownSelection {
            index,
            label: item.label.clone(),
            value: item.value.clone(),
        }))
    }

    pub fn drop_down_items(&self, title: &str) -> PanelResult<&[DropDownItem]> {
        Ok(self.drop_down_data(title)?.0)
    }

    /// Select by position
    pub fn set_drop_down_index(&mut self, title: &str, index: usize) -> PanelResult<&mut Self> {
        self.check_drop_down_index(title, index)?;
        let entry = self.control_of_mut(title, DROPDOWN)?;
        if let ControlData::DropDown { index: current, .. } = &mut entry.data {
            *current = index;
        }
        self.notify(title);
        Ok(self)
    }

    /// Select the first item whose label matches
    pub fn set_drop_down_value(&mut self, title: &str, label: &str) -> PanelResult<&mut Self> {
        let index = self.drop_down_index_of(title, label)?;
        self.set_drop_down_index(title, index)
    }

    pub(crate) fn check_drop_down_index(&self, title: &str, index: usize) -> PanelResult<()> {
        let len = self.drop_down_data(title)?.0.len();
        if index >= len {
            return Err(PanelError::invalid_value(
                title,
                format!("index {} is out of range for {} items", index, len),
            ));
        }
        Ok(())
    }

    /// Position of the first item labelled `label`
    pub(crate) fn drop_down_index_of(&self, title: &str, label: &str) -> PanelResult<usize> {
        self.drop_down_data(title)?
            .0
            .iter()
            .position(|item| item.label == label)
            .ok_or_else(|| PanelError::invalid_value(title, format!("no item labelled '{}'", label)))
    }

    /// Move the selection by `delta`, wrapping at both ends
    pub(crate) fn cycle_drop_down(&mut self, title: &str, delta: i32) -> PanelResult<&mut Self> {
        let (items, index) = self.drop_down_data(title)?;
        if items.is_empty() {
            return Ok(self);
        }
        let len = items.len() as i64;
        let next = (index as i64 + i64::from(delta)).rem_euclid(len) as usize;
        self.set_drop_down_index(title, next)
    }

    fn drop_down_data(&self, title: &str) -> PanelResult<(&[DropDownItem], usize)> {
        match self.control_of(title, DROPDOWN)?.data() {
            ControlData::DropDown { items, index } => Ok((items.as_slice(), *index)),
            _ => unreachable!("dropdown controls always carry dropdown data"),
        }
    }
}
