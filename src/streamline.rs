//! Streamline rules
//!
//! A streamline rule keeps dependent settings consistent with a trigger
//! setting. Rules are plain functions from a read-only [`RuleInput`] to a list
//! of [`Effect`]s; the owning [`SettingGroup`](crate::SettingGroup) checks
//! every effect against the rule's declared dependents and applies them.
//!
//! ```rust
//! use layer_export_settings::{Effect, RuleInput};
//!
//! fn streamline_merge(input: &RuleInput<'_>) -> Vec<Effect> {
//!     if input.is_on() {
//!         vec![Effect::on("layer_groups_as_folders").set_value(false).set_enabled(false)]
//!     } else {
//!         vec![Effect::on("layer_groups_as_folders").set_enabled(true)]
//!     }
//! }
//! ```

use crate::setting::Setting;
use indexmap::IndexMap;
use serde_json::Value;

/// Signature of a streamline rule
pub type RuleFn = fn(&RuleInput<'_>) -> Vec<Effect>;

// =============================================================================
// Rule input
// =============================================================================

/// Read-only view of a trigger setting and its declared dependents
#[derive(Debug, Clone)]
pub struct RuleInput<'a> {
    trigger: &'a Setting,
    dependents: Vec<&'a Setting>,
}

impl<'a> RuleInput<'a> {
    pub fn new(trigger: &'a Setting, dependents: Vec<&'a Setting>) -> Self {
        Self {
            trigger,
            dependents,
        }
    }

    pub fn trigger(&self) -> &'a Setting {
        self.trigger
    }

    /// Current value of the trigger
    pub fn value(&self) -> &'a Value {
        self.trigger.value()
    }

    /// Trigger value as a boolean (`false` for non-booleans)
    pub fn is_on(&self) -> bool {
        self.trigger.as_bool().unwrap_or(false)
    }

    /// Trigger value as an option key (empty for non-strings)
    pub fn key(&self) -> &'a str {
        self.trigger.as_str().unwrap_or_default()
    }

    /// A declared dependent by name
    pub fn dependent(&self, name: &str) -> Option<&'a Setting> {
        self.dependents.iter().copied().find(|s| s.name() == name)
    }

    pub fn dependent_value(&self, name: &str) -> Option<&'a Value> {
        self.dependent(name).map(Setting::value)
    }
}

// =============================================================================
// Effects
// =============================================================================

/// A change a rule wants applied to one dependent
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Effect {
    pub target: String,
    pub value: Option<Value>,
    pub enabled: Option<bool>,
    /// `(failure kind, message)` to store in the target's error-message table
    pub error_message: Option<(String, String)>,
}

impl Effect {
    /// Start an effect on `target` that changes nothing yet
    pub fn on(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn set_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn set_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn set_error_message(mut self, kind: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_message = Some((kind.into(), message.into()));
        self
    }
}

// =============================================================================
// Rule table
// =============================================================================

/// A rule bound to its trigger and declared dependents
#[derive(Debug, Clone)]
pub struct StreamlineRule {
    pub trigger: String,
    pub dependents: Vec<String>,
    pub apply: RuleFn,
}

impl StreamlineRule {
    pub fn declares(&self, name: &str) -> bool {
        self.dependents.iter().any(|d| d == name)
    }
}

/// Rules keyed by trigger name, in attach order
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: IndexMap<String, StreamlineRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, returning the one it replaced
    pub fn insert(&mut self, rule: StreamlineRule) -> Option<StreamlineRule> {
        self.rules.insert(rule.trigger.clone(), rule)
    }

    pub fn get(&self, trigger: &str) -> Option<&StreamlineRule> {
        self.rules.get(trigger)
    }

    pub fn remove(&mut self, trigger: &str) -> Option<StreamlineRule> {
        self.rules.shift_remove(trigger)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
