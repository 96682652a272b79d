//! Pure state transitions for the application form.
//!
//! Every user action and every remote-call completion is an [`FormEvent`].
//! [`reduce`] folds one event into the current [`FormState`] and reports the
//! remote call, if any, that the caller has to perform next. The function never
//! touches the network, which keeps the whole state machine testable without a
//! store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{DraftEntry, FieldName, NewEntry, PersistedEntry};
use super::validation::{validate, ValidationErrors, ValidationPolicy};

/// Snapshot of everything the form renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub draft: DraftEntry,
    pub errors: ValidationErrors,
    /// Last full listing fetched from the store.
    pub items: Vec<PersistedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_save: Option<SaveOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_load_failure: Option<String>,
}

impl FormState {
    pub fn saved(&self) -> bool {
        matches!(self.last_save, Some(SaveOutcome::Saved { .. }))
    }
}

/// Result of the most recent create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { id: u64, at: DateTime<Utc> },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged { field: FieldName, value: String },
    ValidateRequested,
    SubmitRequested,
    CancelRequested,
    CreateSucceeded { entry: PersistedEntry, at: DateTime<Utc> },
    CreateFailed { message: String },
    ItemsLoaded(Vec<PersistedEntry>),
    LoadFailed { message: String },
}

/// Remote call requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Create(NewEntry),
    Load,
}

pub fn reduce(
    state: FormState,
    event: FormEvent,
    policy: &ValidationPolicy,
) -> (FormState, Option<Effect>) {
    match event {
        FormEvent::FieldChanged { field, value } => {
            let draft = state.draft.with_field(field, &value);
            (FormState { draft, ..state }, None)
        }
        FormEvent::ValidateRequested => {
            let (_, errors) = validate(&state.draft, policy);
            (FormState { errors, ..state }, None)
        }
        FormEvent::SubmitRequested => {
            let (valid, errors) = validate(&state.draft, policy);
            let effect = valid.then(|| Effect::Create(state.draft.to_new_entry()));
            // A new attempt supersedes the previous save status.
            (
                FormState {
                    errors,
                    last_save: None,
                    ..state
                },
                effect,
            )
        }
        FormEvent::CancelRequested => (
            FormState {
                draft: DraftEntry::default(),
                errors: ValidationErrors::default(),
                ..state
            },
            None,
        ),
        FormEvent::CreateSucceeded { entry, at } => (
            FormState {
                draft: DraftEntry::default(),
                last_save: Some(SaveOutcome::Saved { id: entry.id, at }),
                ..state
            },
            Some(Effect::Load),
        ),
        FormEvent::CreateFailed { message } => (
            FormState {
                last_save: Some(SaveOutcome::Failed { message }),
                ..state
            },
            None,
        ),
        FormEvent::ItemsLoaded(items) => (
            FormState {
                items,
                last_load_failure: None,
                ..state
            },
            None,
        ),
        FormEvent::LoadFailed { message } => (
            FormState {
                last_load_failure: Some(message),
                ..state
            },
            None,
        ),
    }
}
