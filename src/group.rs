//! Setting groups and streamline propagation
//!
//! A [`SettingGroup`] is an ordered, name-keyed collection of settings that
//! is reset, persisted and displayed as a unit. It also owns the group's
//! streamline rule table and dispatches rules when values change.
//!
//! # Propagation
//!
//! Setting a value through [`SettingGroup::set_value`] applies the rule
//! attached to that setting exactly once, before the call returns. Values a
//! rule writes to its dependents do **not** re-trigger the dependents' own
//! rules; call [`SettingGroup::apply_streamline`] to re-trigger explicitly.

use crate::config::SettingMetadata;
use crate::error::{Error, Result};
use crate::events::{EventManager, SettingEvent};
use crate::setting::Setting;
use crate::streamline::{Effect, RuleFn, RuleInput, RuleTable, StreamlineRule};

use indexmap::IndexMap;
use log::{debug, info};
use serde_json::{Map, Value};

/// Ordered collection of settings with streamline rules
#[derive(Debug)]
pub struct SettingGroup {
    name: String,
    settings: IndexMap<String, Setting>,
    rules: RuleTable,
    events: EventManager,
}

impl SettingGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: IndexMap::new(),
            rules: RuleTable::new(),
            events: EventManager::new(),
        }
    }

    /// Create a group from declarations, in order
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSchema` on the first invalid or duplicate declaration.
    pub fn from_settings<I, K>(name: impl Into<String>, settings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, SettingMetadata)>,
        K: Into<String>,
    {
        let mut group = Self::new(name);
        for (key, metadata) in settings {
            group.create(key, metadata)?;
        }
        Ok(group)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Declare a new setting
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSchema` if the name is already taken in this
    /// group or the metadata fails `validate_schema()` (for example an
    /// enumerated default that is not one of the options).
    pub fn create(&mut self, name: impl Into<String>, metadata: SettingMetadata) -> Result<&Setting> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::schema(name, "setting name cannot be empty"));
        }
        if self.settings.contains_key(&name) {
            return Err(Error::schema(
                name,
                format!("setting already exists in group '{}'", self.name),
            ));
        }
        metadata
            .validate_schema()
            .map_err(|reason| Error::schema(name.clone(), reason))?;

        let entry = self
            .settings
            .entry(name.clone())
            .or_insert_with(|| Setting::new(name, metadata));
        Ok(&*entry)
    }

    /// Look up a setting by name
    ///
    /// # Errors
    ///
    /// Returns `Error::SettingNotFound` if no such setting exists.
    pub fn get(&self, name: &str) -> Result<&Setting> {
        self.settings
            .get(name)
            .ok_or_else(|| Error::SettingNotFound(self.qualified(name)))
    }

    /// Current value of a setting
    ///
    /// # Errors
    ///
    /// Returns `Error::SettingNotFound` if no such setting exists.
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.get(name).map(Setting::value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    /// Setting names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    /// Settings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.values()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Event manager for registering change listeners
    pub fn events_mut(&mut self) -> &mut EventManager {
        &mut self.events
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}/{name}", self.name)
    }

    fn setting_mut(&mut self, name: &str) -> Result<&mut Setting> {
        let qualified = self.qualified(name);
        self.settings
            .get_mut(name)
            .ok_or(Error::SettingNotFound(qualified))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Set a setting's value and apply its streamline rule.
    ///
    /// Disabled settings cannot be changed by the host: the call is a no-op
    /// and returns `Ok(false)`. Otherwise returns `Ok(true)`. If the rule
    /// fails, the previous value is restored and no event is sent.
    ///
    /// # Errors
    ///
    /// - `Error::SettingNotFound` if the setting does not exist
    /// - `Error::InvalidSettingValue` if the value does not fit the setting type
    /// - any error raised while applying the setting's rule
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<bool> {
        let value = value.into();
        let Some(setting) = self.settings.get_mut(name) else {
            return Err(Error::SettingNotFound(format!("{}/{name}", self.name)));
        };

        if !setting.is_enabled() {
            debug!("Ignoring write to disabled setting '{name}' in group '{}'", self.name);
            return Ok(false);
        }

        let old = setting.store(value)?;
        let effects = match self.checked_effects(name) {
            Ok(effects) => effects,
            Err(e) => {
                if let Some(setting) = self.settings.get_mut(name) {
                    setting.restore(old);
                }
                return Err(e);
            }
        };

        if let Some(setting) = self.settings.get(name) {
            if &old != setting.value() {
                self.events.notify(&SettingEvent::ValueChanged {
                    name: setting.name(),
                    old: &old,
                    new: setting.value(),
                });
            }
        }

        self.apply_effects(name, effects);
        Ok(true)
    }

    /// Enable or disable a setting
    ///
    /// # Errors
    ///
    /// Returns `Error::SettingNotFound` if the setting does not exist.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let Some(setting) = self.settings.get_mut(name) else {
            return Err(Error::SettingNotFound(format!("{}/{name}", self.name)));
        };
        if setting.set_enabled(enabled) {
            self.events.notify(&SettingEvent::EnabledChanged {
                name: setting.name(),
                enabled,
            });
        }
        Ok(())
    }

    /// Override the message reported for a validation failure kind
    ///
    /// # Errors
    ///
    /// Returns `Error::SettingNotFound` if the setting does not exist.
    pub fn set_error_message(
        &mut self,
        name: &str,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<()> {
        self.setting_mut(name)?.set_error_message(kind, message);
        Ok(())
    }

    /// Store a value without the enabled check and without applying rules.
    ///
    /// Used when restoring persisted values; run [`streamline`](Self::streamline)
    /// afterwards.
    pub(crate) fn load_value(&mut self, name: &str, value: Value) -> Result<()> {
        let Some(setting) = self.settings.get_mut(name) else {
            return Err(Error::SettingNotFound(format!("{}/{name}", self.name)));
        };
        let old = setting.store(value)?;
        if &old != setting.value() {
            self.events.notify(&SettingEvent::ValueChanged {
                name: setting.name(),
                old: &old,
                new: setting.value(),
            });
        }
        Ok(())
    }

    /// Reset every resettable setting to its default value, initial enabled
    /// flag and initial error messages, then re-apply all rules.
    ///
    /// # Errors
    ///
    /// Returns any error raised while re-applying rules.
    pub fn reset(&mut self) -> Result<()> {
        for setting in self
            .settings
            .values_mut()
            .filter(|s| s.metadata().resettable_by_group)
        {
            let old_value = setting.value().clone();
            let old_enabled = setting.is_enabled();
            setting.reset();

            if &old_value != setting.value() {
                self.events.notify(&SettingEvent::ValueChanged {
                    name: setting.name(),
                    old: &old_value,
                    new: setting.value(),
                });
            }
            if old_enabled != setting.is_enabled() {
                self.events.notify(&SettingEvent::EnabledChanged {
                    name: setting.name(),
                    enabled: setting.is_enabled(),
                });
            }
        }

        info!("Reset setting group '{}'", self.name);
        self.streamline()
    }

    // =========================================================================
    // Streamline rules
    // =========================================================================

    /// Bind a rule to `trigger`. Re-attaching replaces the previous rule.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSchema` if the trigger or a dependent is not in
    /// this group, a dependent is listed twice, or the trigger lists itself.
    pub fn attach_streamline(&mut self, trigger: &str, apply: RuleFn, dependents: &[&str]) -> Result<()> {
        self.get(trigger)
            .map_err(|_| Error::schema(trigger, "streamline trigger is not in the group"))?;

        for (idx, dependent) in dependents.iter().enumerate() {
            if *dependent == trigger {
                return Err(Error::schema(trigger, "a setting cannot depend on itself"));
            }
            if !self.contains(dependent) {
                return Err(Error::schema(
                    trigger,
                    format!("dependent '{dependent}' is not in the group"),
                ));
            }
            if dependents[..idx].contains(dependent) {
                return Err(Error::schema(
                    trigger,
                    format!("dependent '{dependent}' is declared twice"),
                ));
            }
        }

        let replaced = self.rules.insert(StreamlineRule {
            trigger: trigger.to_string(),
            dependents: dependents.iter().map(|d| (*d).to_string()).collect(),
            apply,
        });
        if replaced.is_some() {
            debug!("Replaced streamline rule for '{trigger}'");
        }
        Ok(())
    }

    /// Remove the rule attached to `trigger`, returning whether one existed
    pub fn detach_streamline(&mut self, trigger: &str) -> bool {
        self.rules.remove(trigger).is_some()
    }

    /// The rule attached to `trigger`, if any
    pub fn streamline_rule(&self, trigger: &str) -> Option<&StreamlineRule> {
        self.rules.get(trigger)
    }

    /// Apply the rule attached to `trigger` once.
    ///
    /// All effects are checked before any is applied; on error the group is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// - `Error::UndeclaredDependent` if the rule targets a setting it did not declare
    /// - `Error::InvalidSettingValue` if the rule produces a value that does not fit
    pub fn apply_streamline(&mut self, trigger: &str) -> Result<()> {
        let effects = self.checked_effects(trigger)?;
        self.apply_effects(trigger, effects);
        Ok(())
    }

    /// Evaluate the rule attached to `trigger` against the current values and
    /// check every effect, without changing anything.
    fn checked_effects(&self, trigger: &str) -> Result<Vec<Effect>> {
        let Some(rule) = self.rules.get(trigger) else {
            return Ok(Vec::new());
        };
        let trigger_setting = self
            .settings
            .get(trigger)
            .ok_or_else(|| Error::SettingNotFound(trigger.to_string()))?;
        let dependents = rule
            .dependents
            .iter()
            .filter_map(|name| self.settings.get(name))
            .collect();
        let effects = (rule.apply)(&RuleInput::new(trigger_setting, dependents));

        for effect in &effects {
            let target = self
                .settings
                .get(&effect.target)
                .filter(|_| rule.declares(&effect.target))
                .ok_or_else(|| Error::UndeclaredDependent {
                    trigger: trigger.to_string(),
                    target: effect.target.clone(),
                })?;
            if let Some(value) = &effect.value {
                target
                    .metadata()
                    .validate(value)
                    .map_err(|reason| Error::InvalidSettingValue {
                        key: effect.target.clone(),
                        reason,
                    })?;
            }
        }
        Ok(effects)
    }

    fn apply_effects(&mut self, trigger: &str, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        debug!(
            "Streamline '{trigger}' in group '{}': {} effect(s)",
            self.name,
            effects.len()
        );
        for effect in effects {
            Self::apply_effect(&mut self.settings, &self.events, effect);
        }
    }

    /// Apply every rule once, in attach order
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a rule.
    pub fn streamline(&mut self) -> Result<()> {
        let triggers: Vec<String> = self.rules.triggers().map(String::from).collect();
        for trigger in triggers {
            self.apply_streamline(&trigger)?;
        }
        Ok(())
    }

    fn apply_effect(settings: &mut IndexMap<String, Setting>, events: &EventManager, effect: Effect) {
        let Some(setting) = settings.get_mut(&effect.target) else {
            return;
        };

        if let Some(value) = effect.value {
            if setting.value() != &value {
                if let Ok(old) = setting.store(value) {
                    events.notify(&SettingEvent::ValueChanged {
                        name: setting.name(),
                        old: &old,
                        new: setting.value(),
                    });
                }
            }
        }
        if let Some(enabled) = effect.enabled {
            if setting.set_enabled(enabled) {
                events.notify(&SettingEvent::EnabledChanged {
                    name: setting.name(),
                    enabled,
                });
            }
        }
        if let Some((kind, message)) = effect.error_message {
            setting.set_error_message(kind, message);
        }
    }

    // =========================================================================
    // Validation & values
    // =========================================================================

    /// Validate one setting's value
    ///
    /// # Errors
    ///
    /// `Error::ValidationFailed` with the resolved message, or
    /// `Error::SettingNotFound`.
    pub fn validate(&self, name: &str) -> Result<()> {
        self.get(name)?.validate()
    }

    /// Validation failures of every enabled setting, in declaration order
    pub fn validation_errors(&self) -> Vec<Error> {
        self.settings
            .values()
            .filter(|s| s.is_enabled())
            .filter_map(|s| s.validate().err())
            .collect()
    }

    /// All current values keyed by name
    pub fn values(&self) -> Map<String, Value> {
        self.settings
            .iter()
            .map(|(name, s)| (name.clone(), s.value().clone()))
            .collect()
    }

    /// Values that differ from their defaults
    pub fn non_default_values(&self) -> Map<String, Value> {
        self.settings
            .iter()
            .filter(|(_, s)| !s.is_default())
            .map(|(name, s)| (name.clone(), s.value().clone()))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
