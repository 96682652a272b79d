use crate::cli::StoreArgs;
use crate::infra::{sharepoint_client, InMemoryListStore};
use applications_form::config::AppConfig;
use applications_form::error::AppError;
use applications_form::forms::applications::{
    ApplicationFormController, ApplicationType, DraftEntry, FieldName, ListStore, LoadOutcome,
    PersistedEntry, SubmitOutcome, ValidationPolicy,
};
use applications_form::telemetry;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

#[derive(Args, Debug)]
pub(crate) struct AddArgs {
    /// Application name (3-50 letters, digits or spaces)
    #[arg(long)]
    pub(crate) name: String,
    /// Application type: "COTS", "Custom" or "Select option"
    #[arg(long = "type", default_value = "COTS")]
    pub(crate) application_type: ApplicationType,
    /// Contact email address
    #[arg(long)]
    pub(crate) contact: String,
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

pub(crate) async fn run_list(args: ListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if args.store.in_memory {
        list_entries(Arc::new(InMemoryListStore::default()), config.form).await
    } else {
        let client = sharepoint_client(&config.store)?;
        list_entries(Arc::new(client), config.form).await
    }
}

pub(crate) async fn run_add(args: AddArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if args.store.in_memory {
        add_entry(Arc::new(InMemoryListStore::default()), config.form, args).await
    } else {
        let client = sharepoint_client(&config.store)?;
        add_entry(Arc::new(client), config.form, args).await
    }
}

async fn list_entries<S>(store: Arc<S>, policy: ValidationPolicy) -> Result<(), AppError>
where
    S: ListStore + 'static,
{
    let controller = ApplicationFormController::new(store, policy);
    match controller.load_items().await {
        LoadOutcome::Loaded { .. } => print_entries(&controller.snapshot().items),
        LoadOutcome::Failed(message) => println!("Entries unavailable: {}", message),
    }
    Ok(())
}

async fn add_entry<S>(
    store: Arc<S>,
    policy: ValidationPolicy,
    args: AddArgs,
) -> Result<(), AppError>
where
    S: ListStore + 'static,
{
    let controller = ApplicationFormController::new(store, policy);
    let draft = DraftEntry {
        application_name: args.name,
        application_type: args.application_type,
        contact: args.contact,
    };

    match controller.submit_draft(draft).await {
        SubmitOutcome::Invalid(errors) => {
            println!("Entry rejected:");
            for field in [
                FieldName::ApplicationName,
                FieldName::ApplicationType,
                FieldName::Contact,
            ] {
                if let Some(message) = errors.message(field) {
                    println!("- {}: {}", field, message);
                }
            }
        }
        SubmitOutcome::Saved(entry) => {
            println!("Data Saved Successfully (Id {})", entry.id);
            let state = controller.snapshot();
            if state.last_load_failure.is_some() {
                println!("List refresh failed; showing the saved entry only");
                print_entries(std::slice::from_ref(&entry));
            } else {
                print_entries(&state.items);
            }
        }
        SubmitOutcome::Failed(message) => println!("Entry not saved: {}", message),
    }

    Ok(())
}

pub(crate) fn format_entries(items: &[PersistedEntry]) -> Vec<String> {
    let headers = ["Application Name", "Application Type", "Contact Email"];
    let rows: Vec<[&str; 3]> = items
        .iter()
        .map(|item| {
            [
                item.title.as_deref().unwrap_or_default(),
                item.application_type.as_deref().unwrap_or_default(),
                item.contact.as_deref().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = headers.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: [&str; 3]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render(headers)];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.into_iter().map(render));
    lines
}

fn print_entries(items: &[PersistedEntry]) {
    if items.is_empty() {
        println!("No entries in the list");
    }
    for line in format_entries(items) {
        println!("{}", line);
    }
}
