use serde_json::Value;

use crate::domain::FormSchema;

use super::{
    actions::{FormCommand, FormEvent},
    error::FormError,
    state::FormState,
};

/// Applies one command to `state`, returning the event observers should see.
pub fn apply_command(
    state: &mut FormState,
    schema: &FormSchema,
    source: &Value,
    command: FormCommand,
) -> Result<FormEvent, FormError> {
    match command {
        FormCommand::SetField { name, value } => {
            state.set_field_value(&name, value)?;
            Ok(FormEvent::FieldChanged { name })
        }
        FormCommand::RevertField { name } => {
            state.revert_field(&name)?;
            Ok(FormEvent::FieldReverted { name })
        }
        FormCommand::Reset => {
            state.reset(schema, source);
            Ok(FormEvent::Reset)
        }
    }
}

/// Fan-out of form events to registered observers.
#[derive(Default)]
pub struct Listeners {
    observers: Vec<Box<dyn FnMut(&FormEvent) + Send>>,
}

impl Listeners {
    pub fn subscribe(&mut self, observer: impl FnMut(&FormEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn notify(&mut self, event: &FormEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("observers", &self.observers.len())
            .finish()
    }
}
