use super::common::*;

use crate::forms::applications::domain::{ApplicationType, DraftEntry, FieldName, NewEntry};
use crate::forms::applications::state::SaveOutcome;
use crate::forms::applications::validation::{ValidationPolicy, NAME_LENGTH_MESSAGE};
use crate::forms::applications::{ApplicationFormController, LoadOutcome, SubmitOutcome};
use std::sync::Arc;

#[tokio::test]
async fn invalid_draft_never_reaches_the_store() {
    let (controller, store) = build_controller(RecordingStore::default());
    fill(&controller, &draft("AB", ApplicationType::Cots, "x@y.com"));

    let outcome = controller.submit().await;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.application_name, NAME_LENGTH_MESSAGE);
            assert_eq!(errors.contact, "");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(store.created().is_empty());
    assert_eq!(store.reads(), 0);

    let state = controller.snapshot();
    assert_eq!(state.draft.application_name, "AB");
    assert_eq!(state.errors.application_name, NAME_LENGTH_MESSAGE);
}

#[tokio::test]
async fn successful_submit_creates_resets_and_reloads_once() {
    let (controller, store) =
        build_controller(RecordingStore::with_items(vec![persisted(1, "Payroll")]));
    controller.load_items().await;
    assert_eq!(store.reads(), 1);

    fill(&controller, &draft("My App 1", ApplicationType::Cots, "a@b.com"));
    let outcome = controller.submit().await;

    let saved = match outcome {
        SubmitOutcome::Saved(entry) => entry,
        other => panic!("expected save, got {other:?}"),
    };
    assert_eq!(saved.id, 2);
    assert_eq!(
        store.created(),
        vec![NewEntry {
            title: "My App 1".to_string(),
            application_type: ApplicationType::Cots,
            contact: "a@b.com".to_string(),
        }]
    );
    assert_eq!(store.reads(), 2);

    let state = controller.snapshot();
    assert_eq!(state.draft, DraftEntry::default());
    assert!(state.errors.is_empty());
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[1].title.as_deref(), Some("My App 1"));
    assert!(matches!(state.last_save, Some(SaveOutcome::Saved { id: 2, .. })));
}

#[tokio::test]
async fn failed_create_keeps_draft_and_logs() {
    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(logs.subscriber());

    let (controller, store) = build_controller(RecordingStore::default());
    store.fail_creates(true);
    let entry = draft("My App 1", ApplicationType::Custom, "a@b.com");
    fill(&controller, &entry);

    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(store.reads(), 0);
    let state = controller.snapshot();
    assert_eq!(state.draft, entry);
    assert!(matches!(state.last_save, Some(SaveOutcome::Failed { .. })));
    assert!(logs.contents().contains("error saving item"));
}

#[tokio::test]
async fn failed_initial_load_leaves_empty_list_and_usable_form() {
    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(logs.subscriber());

    let (controller, store) = build_controller(RecordingStore::default());
    store.fail_reads(true);

    let outcome = controller.load_items().await;

    assert!(matches!(outcome, LoadOutcome::Failed(_)));
    let state = controller.snapshot();
    assert!(state.items.is_empty());
    assert!(state.last_load_failure.is_some());
    assert!(logs.contents().contains("error loading items"));

    controller.update_field(FieldName::ApplicationName, "Still Works");
    assert_eq!(controller.snapshot().draft.application_name, "Still Works");
}

#[tokio::test]
async fn failed_reload_keeps_stale_items_visible() {
    let (controller, store) = build_controller(RecordingStore::with_items(vec![
        persisted(1, "Payroll"),
        persisted(2, "CRM"),
    ]));
    controller.load_items().await;

    store.fail_reads(true);
    fill(&controller, &draft("Ledger", ApplicationType::Cots, "fin@example.com"));
    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    let state = controller.snapshot();
    assert_eq!(state.items, vec![persisted(1, "Payroll"), persisted(2, "CRM")]);
    assert_eq!(state.draft, DraftEntry::default());
    assert!(state.last_load_failure.is_some());
}

#[tokio::test]
async fn validation_errors_are_not_logged() {
    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(logs.subscriber());

    let (controller, _) = build_controller(RecordingStore::default());
    controller.update_field(FieldName::Contact, "not-an-email");
    let (valid, _) = controller.validate();
    controller.submit().await;

    assert!(!valid);
    assert!(logs.contents().is_empty());
}

#[tokio::test]
async fn cancel_clears_draft_and_errors_without_remote_calls() {
    let (controller, store) = build_controller(RecordingStore::default());
    fill(&controller, &draft("x", ApplicationType::SelectOption, "y"));
    controller.validate();

    controller.cancel();

    let state = controller.snapshot();
    assert_eq!(state.draft, DraftEntry::default());
    assert!(state.errors.is_empty());
    assert_eq!(store.reads(), 0);
    assert!(store.created().is_empty());
}

#[tokio::test]
async fn rapid_submits_each_reach_the_store() {
    let (controller, store) = build_controller(RecordingStore::default());

    fill(&controller, &draft("First App", ApplicationType::Cots, "a@b.com"));
    let first = controller.submit();
    let second = async {
        fill(&controller, &draft("Second App", ApplicationType::Custom, "c@d.com"));
        controller.submit().await
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, SubmitOutcome::Saved(_)));
    assert!(matches!(second, SubmitOutcome::Saved(_)));
    assert_eq!(store.created().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_draft_submits_keep_each_entry_intact() {
    let (controller, store) = build_controller(RecordingStore::default());

    let tasks: Vec<_> = (0..200)
        .map(|n| {
            let controller = controller.clone();
            tokio::spawn(async move {
                let entry = draft(
                    &format!("App {n}"),
                    ApplicationType::Custom,
                    &format!("u{n}@example.com"),
                );
                controller.submit_draft(entry).await
            })
        })
        .collect();
    for task in tasks {
        let outcome = task.await.expect("submit task joins");
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    }

    let created = store.created();
    assert_eq!(created.len(), 200);
    for entry in created {
        let n = entry.title.trim_start_matches("App ");
        assert_eq!(entry.contact, format!("u{n}@example.com"));
        assert_eq!(entry.application_type, ApplicationType::Custom);
    }
}

#[tokio::test]
async fn submit_draft_reports_errors_for_the_supplied_values() {
    let (controller, store) = build_controller(RecordingStore::default());
    fill(&controller, &draft("Existing App", ApplicationType::Cots, "a@b.com"));

    let outcome = controller
        .submit_draft(draft("AB", ApplicationType::Cots, "nope"))
        .await;

    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(controller.snapshot().draft.application_name, "AB");
    assert!(store.created().is_empty());
}

#[tokio::test]
async fn policy_can_require_an_application_type() {
    let store = Arc::new(RecordingStore::default());
    let controller = ApplicationFormController::new(
        store.clone(),
        ValidationPolicy {
            require_application_type: true,
        },
    );
    controller.update_field(FieldName::ApplicationName, "My App 1");
    controller.update_field(FieldName::ApplicationType, "Select option");
    controller.update_field(FieldName::Contact, "a@b.com");

    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert!(store.created().is_empty());
}
