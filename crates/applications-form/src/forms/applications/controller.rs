use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{error, info};

use super::domain::{DraftEntry, FieldName, PersistedEntry};
use super::state::{reduce, Effect, FormEvent, FormState};
use super::store::ListStore;
use super::validation::{ValidationErrors, ValidationPolicy};

/// Drives the form state machine and performs the remote calls its
/// transitions ask for.
///
/// The state lock is only held while a transition is applied, never across a
/// store call, so a slow store cannot block field edits.
pub struct ApplicationFormController<S> {
    store: Arc<S>,
    policy: ValidationPolicy,
    state: Mutex<FormState>,
}

/// What happened to a submit request.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent to the store.
    Invalid(ValidationErrors),
    Saved(PersistedEntry),
    /// The store rejected or never received the create request.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    Failed(String),
}

impl<S> ApplicationFormController<S>
where
    S: ListStore + 'static,
{
    pub fn new(store: Arc<S>, policy: ValidationPolicy) -> Self {
        Self {
            store,
            policy,
            state: Mutex::new(FormState::default()),
        }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> FormState {
        self.lock().clone()
    }

    pub fn update_field(&self, field: FieldName, value: impl Into<String>) {
        self.dispatch(FormEvent::FieldChanged {
            field,
            value: value.into(),
        });
    }

    /// Recomputes the error map from the current draft.
    pub fn validate(&self) -> (bool, ValidationErrors) {
        let (_, errors) = self.dispatch_with(FormEvent::ValidateRequested, |state| {
            state.errors.clone()
        });
        (errors.is_empty(), errors)
    }

    pub fn cancel(&self) {
        self.dispatch(FormEvent::CancelRequested);
    }

    /// Validates the draft and, when it passes, creates the item and reloads
    /// the listing.
    pub async fn submit(&self) -> SubmitOutcome {
        let (effect, errors) =
            self.dispatch_with(FormEvent::SubmitRequested, |state| state.errors.clone());
        self.complete_submit(effect, errors).await
    }

    /// Fills every field from `draft` and submits it as one transition, so
    /// concurrent callers sharing this controller cannot interleave their
    /// edits between the fill and the submit.
    pub async fn submit_draft(&self, draft: DraftEntry) -> SubmitOutcome {
        let events = [
            FormEvent::FieldChanged {
                field: FieldName::ApplicationName,
                value: draft.application_name,
            },
            FormEvent::FieldChanged {
                field: FieldName::ApplicationType,
                value: draft.application_type.as_str().to_string(),
            },
            FormEvent::FieldChanged {
                field: FieldName::Contact,
                value: draft.contact,
            },
            FormEvent::SubmitRequested,
        ];
        let (effect, errors) = self.dispatch_all_with(events, |state| state.errors.clone());
        self.complete_submit(effect, errors).await
    }

    async fn complete_submit(
        &self,
        effect: Option<Effect>,
        errors: ValidationErrors,
    ) -> SubmitOutcome {
        let new_entry = match effect {
            Some(Effect::Create(entry)) => entry,
            _ => return SubmitOutcome::Invalid(errors),
        };

        match self.store.create(&new_entry).await {
            Ok(entry) => {
                info!(id = entry.id, title = %new_entry.title, "application saved");
                let follow_up = self.dispatch(FormEvent::CreateSucceeded {
                    entry: entry.clone(),
                    at: Utc::now(),
                });
                if let Some(Effect::Load) = follow_up {
                    self.load_items().await;
                }
                SubmitOutcome::Saved(entry)
            }
            Err(err) => {
                error!(error = %err, "error saving item");
                let message = err.to_string();
                self.dispatch(FormEvent::CreateFailed {
                    message: message.clone(),
                });
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Replaces the listing with a fresh read from the store. On failure the
    /// previous listing stays in place.
    pub async fn load_items(&self) -> LoadOutcome {
        match self.store.items().await {
            Ok(items) => {
                let count = items.len();
                self.dispatch(FormEvent::ItemsLoaded(items));
                LoadOutcome::Loaded { count }
            }
            Err(err) => {
                error!(error = %err, "error loading items");
                let message = err.to_string();
                self.dispatch(FormEvent::LoadFailed {
                    message: message.clone(),
                });
                LoadOutcome::Failed(message)
            }
        }
    }

    fn dispatch(&self, event: FormEvent) -> Option<Effect> {
        self.dispatch_with(event, |_| ()).0
    }

    fn dispatch_with<T>(
        &self,
        event: FormEvent,
        inspect: impl FnOnce(&FormState) -> T,
    ) -> (Option<Effect>, T) {
        self.dispatch_all_with([event], inspect)
    }

    /// Applies `events` in order under one lock. The effect of the last event
    /// is returned.
    fn dispatch_all_with<T>(
        &self,
        events: impl IntoIterator<Item = FormEvent>,
        inspect: impl FnOnce(&FormState) -> T,
    ) -> (Option<Effect>, T) {
        let mut guard = self.lock();
        let mut effect = None;
        for event in events {
            let current = std::mem::take(&mut *guard);
            let (next, emitted) = reduce(current, event, &self.policy);
            *guard = next;
            effect = emitted;
        }
        (effect, inspect(&guard))
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
