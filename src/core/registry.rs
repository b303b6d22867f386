// Control Registry
// Title-keyed store of a panel's controls, kept in insertion order
//
// Usage:
//   let mut registry = ControlRegistry::new();
//   registry.insert(entry);
//   if let Some(entry) = registry.get("Speed") { ... }

use std::collections::HashMap;

use super::control::ControlEntry;

/// Registry of controls owned by one panel
#[derive(Debug, Default)]
pub struct ControlRegistry {
    /// Map of title to entry
    entries: HashMap<String, ControlEntry>,
    /// Titles in display order
    order: Vec<String>,
}

impl ControlRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under its title
    /// An existing entry with the same title is replaced in place and returned
    pub fn insert(&mut self, entry: ControlEntry) -> Option<ControlEntry> {
        let title = entry.title().to_string();
        let previous = self.entries.insert(title.clone(), entry);
        if previous.is_none() {
            self.order.push(title);
        }
        previous
    }

    pub fn get(&self, title: &str) -> Option<&ControlEntry> {
        self.entries.get(title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut ControlEntry> {
        self.entries.get_mut(title)
    }

    /// Remove an entry by title
    pub fn remove(&mut self, title: &str) -> Option<ControlEntry> {
        let removed = self.entries.remove(title)?;
        self.order.retain(|t| t != title);
        Some(removed)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(title)
    }

    /// Titles in display order
    pub fn titles(&self) -> &[String] {
        &self.order
    }

    /// Entries in display order
    pub fn iter(&self) -> impl Iterator<Item = &ControlEntry> {
        self.order.iter().filter_map(|title| self.entries.get(title))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::control::{ControlData, ControlKind};

    fn boolean(title: &str, value: bool) -> ControlEntry {
        ControlEntry::new(title, ControlKind::Boolean, ControlData::Boolean(value))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = ControlRegistry::new();
        assert!(registry.insert(boolean("A", true)).is_none());
        assert!(registry.contains("A"));
        assert_eq!(registry.get("A").unwrap().title(), "A");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut registry = ControlRegistry::new();
        registry.insert(boolean("A", true));
        registry.insert(boolean("B", true));
        let previous = registry.insert(boolean("A", false));

        assert!(previous.is_some());
        assert_eq!(registry.titles(), &["A".to_string(), "B".to_string()]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_updates_order() {
        let mut registry = ControlRegistry::new();
        registry.insert(boolean("A", true));
        registry.insert(boolean("B", true));
        registry.insert(boolean("C", true));

        assert!(registry.remove("B").is_some());
        assert!(registry.remove("B").is_none());
        let titles: Vec<&str> = registry.iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_clear() {
        let mut registry = ControlRegistry::new();
        registry.insert(boolean("A", true));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.titles().is_empty());
    }
}
