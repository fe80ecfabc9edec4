use serde_json::Value;
use tracing::{debug, error};

use crate::domain::FormSchema;

use super::{
    error::FormError,
    snapshot::{ErrorMap, FormSnapshot},
};

/// A field whose edit buffer differs from the confirmed value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub name: String,
    pub initial: Value,
    pub current: Value,
}

/// The value side of a form: the server-confirmed snapshot, the edit buffer,
/// and server-reported validation errors.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    initial: FormSnapshot,
    current: FormSnapshot,
    errors: ErrorMap,
}

impl FormState {
    /// Seeds both snapshots from `source`. Performs no I/O.
    pub fn initialize(schema: &FormSchema, source: &Value) -> Self {
        let initial = FormSnapshot::from_source(schema, source);
        let current = initial.clone();
        debug!(fields = initial.len(), "form state initialized");
        Self {
            initial,
            current,
            errors: ErrorMap::new(),
        }
    }

    /// Discards every edit and error by rebuilding from the source object.
    pub fn reset(&mut self, schema: &FormSchema, source: &Value) {
        *self = Self::initialize(schema, source);
    }

    pub fn initial(&self) -> &FormSnapshot {
        &self.initial
    }

    pub fn current(&self) -> &FormSnapshot {
        &self.current
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.current.get(name)
    }

    pub fn field_errors(&self, name: &str) -> &[String] {
        self.errors.get(name).unwrap_or(&[])
    }

    /// Overwrites one field in the edit buffer and drops its errors.
    pub fn set_field_value(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        if !self.current.set(name, value) {
            error!(field = %name, "attempted to edit a field outside the schema");
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.errors.remove(name);
        Ok(())
    }

    /// Restores one field to its confirmed value and drops its errors.
    pub fn revert_field(&mut self, name: &str) -> Result<(), FormError> {
        let Some(initial) = self.initial.get(name).cloned() else {
            error!(field = %name, "attempted to revert a field outside the schema");
            return Err(FormError::UnknownField(name.to_string()));
        };
        self.current.set(name, initial);
        self.errors.remove(name);
        Ok(())
    }

    /// Commits an authoritative snapshot: it becomes both `current` and
    /// `initial`, and all errors are cleared.
    pub fn commit(&mut self, confirmed: FormSnapshot) {
        debug_assert!(confirmed.same_keys(&self.initial));
        self.initial = confirmed.clone();
        self.current = confirmed;
        self.errors.clear();
    }

    /// Replaces the error map wholesale; both snapshots are untouched.
    pub fn reject(&mut self, errors: ErrorMap) {
        self.errors = errors;
    }

    pub fn diff(&self) -> Vec<FieldChange> {
        changes_between(&self.initial, &self.current)
    }

    /// Fields whose confirmed value differs from `before`, typically the
    /// baseline captured before a save.
    pub fn changes_since(&self, before: &FormSnapshot) -> Vec<FieldChange> {
        changes_between(before, &self.initial)
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.initial
    }

    pub fn is_field_dirty(&self, name: &str) -> bool {
        self.current.get(name) != self.initial.get(name)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

fn changes_between(from: &FormSnapshot, to: &FormSnapshot) -> Vec<FieldChange> {
    to.iter()
        .filter_map(|(name, current)| {
            let initial = from.get(name).unwrap_or(&Value::Null);
            (initial != current).then(|| FieldChange {
                name: name.to_string(),
                initial: initial.clone(),
                current: current.clone(),
            })
        })
        .collect()
}
