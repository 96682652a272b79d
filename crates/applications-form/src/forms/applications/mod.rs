//! Application intake form: draft state, validation, list synchronization and
//! the HTML/JSON surface served on top of it.

pub mod controller;
pub mod domain;
pub mod router;
pub mod sharepoint;
pub mod state;
pub mod store;
pub mod validation;
pub mod view;

#[cfg(test)]
mod tests;

pub use controller::{ApplicationFormController, LoadOutcome, SubmitOutcome};
pub use domain::{ApplicationType, DraftEntry, FieldName, NewEntry, PersistedEntry};
pub use router::{application_router, FormSubmission};
pub use sharepoint::SharePointListClient;
pub use state::{reduce, Effect, FormEvent, FormState, SaveOutcome};
pub use store::{ListStore, StoreError};
pub use validation::{validate, ValidationErrors, ValidationPolicy};
pub use view::{render_entries_table, render_page};
