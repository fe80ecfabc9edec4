mod actions;
mod choices;
mod error;
mod reducers;
mod snapshot;
mod state;

pub use actions::{FormCommand, FormEvent};
pub use choices::ChoiceCache;
pub use error::FormError;
pub use reducers::{Listeners, apply_command};
pub use snapshot::{ErrorMap, FormSnapshot};
pub use state::{FieldChange, FormState};
