// Bind Targets
// Objects that `bind_*` controls write their value into, keyed by control title

use serde_json::{Map, Value as JsonValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::control::{ControlValue, ValueCallback};

/// Something a bound control can write into
pub trait BindTarget {
    fn set_field(&mut self, key: &str, value: &ControlValue);
}

impl BindTarget for HashMap<String, ControlValue> {
    fn set_field(&mut self, key: &str, value: &ControlValue) {
        self.insert(key.to_string(), value.clone());
    }
}

impl BindTarget for Map<String, JsonValue> {
    fn set_field(&mut self, key: &str, value: &ControlValue) {
        let json = match value {
            // dropdowns bind their item value, not the label
            ControlValue::Selection(selection) => Some(selection.value.clone()),
            other => other.to_json(),
        };
        if let Some(json) = json {
            self.insert(key.to_string(), json);
        }
    }
}

/// Callback writing every change into `target[title]`
pub(crate) fn bind_callback<T>(title: &str, target: Rc<RefCell<T>>) -> ValueCallback
where
    T: BindTarget + 'static,
{
    let key = title.to_string();
    Box::new(move |value: &ControlValue| {
        target.borrow_mut().set_field(&key, value);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::control::DropDownSelection;

    #[test]
    fn test_bind_callback_writes_hash_map() {
        let target = Rc::new(RefCell::new(HashMap::<String, ControlValue>::new()));
        let mut callback = bind_callback("Speed", target.clone());
        callback(&ControlValue::Number(3.0));
        assert_eq!(target.borrow().get("Speed"), Some(&ControlValue::Number(3.0)));
    }

    #[test]
    fn test_json_map_takes_dropdown_value() {
        let mut map = Map::new();
        map.set_field(
            "Mode",
            &ControlValue::Selection(DropDownSelection {
                index: 0,
                label: "Fast".to_string(),
                value: JsonValue::from(2),
            }),
        );
        assert_eq!(map.get("Mode"), Some(&JsonValue::from(2)));
    }
}
