//! Change notifications for UI bindings
//!
//! Every value or enabled-flag change made through a group, whether by the
//! host or by a streamline rule, is reported to the registered listeners.

use serde_json::Value;
use std::collections::HashMap;

/// A change to a setting in a group
#[derive(Debug, Clone, PartialEq)]
pub enum SettingEvent<'a> {
    ValueChanged {
        name: &'a str,
        old: &'a Value,
        new: &'a Value,
    },
    EnabledChanged {
        name: &'a str,
        enabled: bool,
    },
}

impl SettingEvent<'_> {
    /// Name of the setting the event is about
    pub fn name(&self) -> &str {
        match self {
            SettingEvent::ValueChanged { name, .. } | SettingEvent::EnabledChanged { name, .. } => {
                name
            }
        }
    }
}

/// Type alias for a change callback
pub type ChangeCallback = Box<dyn Fn(&SettingEvent<'_>)>;

/// Manages event listeners for a setting group
#[derive(Default)]
pub struct EventManager {
    /// Called for every change in the group
    global_listeners: Vec<ChangeCallback>,

    /// Called only for changes of one setting
    key_listeners: HashMap<String, Vec<ChangeCallback>>,
}

impl EventManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all changes
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: Fn(&SettingEvent<'_>) + 'static,
    {
        self.global_listeners.push(Box::new(callback));
    }

    /// Register a listener for a specific setting
    pub fn watch<F>(&mut self, name: &str, callback: F)
    where
        F: Fn(&SettingEvent<'_>) + 'static,
    {
        self.key_listeners
            .entry(name.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Notify all interested listeners
    pub fn notify(&self, event: &SettingEvent<'_>) {
        for callback in &self.global_listeners {
            callback(event);
        }
        if let Some(listeners) = self.key_listeners.get(event.name()) {
            for callback in listeners {
                callback(event);
            }
        }
    }

    /// Remove all listeners for a specific setting
    pub fn unwatch(&mut self, name: &str) {
        self.key_listeners.remove(name);
    }

    /// Clear all listeners
    pub fn clear(&mut self) {
        self.global_listeners.clear();
        self.key_listeners.clear();
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("global_listeners", &self.global_listeners.len())
            .field("key_listeners", &self.key_listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_global_listener() {
        let mut events = EventManager::new();
        let counter = Rc::new(Cell::new(0));
        let counter_clone = counter.clone();

        events.on_change(move |_event| counter_clone.set(counter_clone.get() + 1));

        events.notify(&SettingEvent::EnabledChanged {
            name: "empty_folders",
            enabled: false,
        });

        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_key_specific_listener() {
        let mut events = EventManager::new();
        let counter = Rc::new(Cell::new(0));
        let counter_clone = counter.clone();

        events.watch("autocrop", move |_event| {
            counter_clone.set(counter_clone.get() + 1)
        });

        events.notify(&SettingEvent::ValueChanged {
            name: "autocrop",
            old: &json!(false),
            new: &json!(true),
        });
        events.notify(&SettingEvent::ValueChanged {
            name: "strip_mode",
            old: &json!("identical"),
            new: &json!("never"),
        });

        assert_eq!(counter.get(), 1);

        events.unwatch("autocrop");
        events.notify(&SettingEvent::EnabledChanged {
            name: "autocrop",
            enabled: true,
        });
        assert_eq!(counter.get(), 1);
    }
}
