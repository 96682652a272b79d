use std::fmt::Write as _;

use super::domain::{ApplicationType, DraftEntry, FieldName, PersistedEntry};
use super::state::{FormState, SaveOutcome};
use super::validation::ValidationErrors;

pub const SAVED_MESSAGE: &str = "Data Saved Successfully";
pub const SAVE_FAILED_MESSAGE: &str = "Data could not be saved. Please try again.";
pub const STALE_LIST_MESSAGE: &str = "The list could not be refreshed; showing the last loaded entries.";

/// Full page: the form followed by the entries table.
pub fn render_page(state: &FormState) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>Applications</title>\n</head>\n<body>\n");
    html.push_str("<div class=\"applicationsForm\">\n<div class=\"container\">\n");
    html.push_str(&render_form(&state.draft, &state.errors, state.last_save.as_ref()));

    html.push_str("<div class=\"gridSection\">\n<h2>Applications List</h2>\n");
    if state.last_load_failure.is_some() {
        writeln!(
            html,
            "<div class=\"notice\">{}</div>",
            escape_html(STALE_LIST_MESSAGE)
        )
        .expect("stale notice");
    }
    html.push_str("<div class=\"gridContainer\">\n");
    html.push_str(&render_entries_table(&state.items));
    html.push_str("</div>\n</div>\n</div>\n</div>\n</body>\n</html>\n");
    html
}

pub fn render_form(
    draft: &DraftEntry,
    errors: &ValidationErrors,
    last_save: Option<&SaveOutcome>,
) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"formSection\">\n<h2>Application Form</h2>\n");
    html.push_str("<form method=\"post\" action=\"/\">\n<div class=\"formRow\">\n");

    html.push_str(&render_input(
        FieldName::ApplicationName,
        "Application Name:",
        "text",
        &draft.application_name,
        errors,
    ));
    html.push_str(&render_type_select(draft.application_type, errors));
    html.push_str(&render_input(
        FieldName::Contact,
        "Contact Email:",
        "email",
        &draft.contact,
        errors,
    ));

    html.push_str("</div>\n<div class=\"buttonGroup\">\n");
    html.push_str("<button type=\"submit\" class=\"saveButton\">Save</button>\n");
    match last_save {
        Some(SaveOutcome::Saved { .. }) => {
            writeln!(html, "<div class=\"status\">{SAVED_MESSAGE}</div>").expect("saved status")
        }
        Some(SaveOutcome::Failed { .. }) => writeln!(
            html,
            "<div class=\"status errorMessage\">{}</div>",
            escape_html(SAVE_FAILED_MESSAGE)
        )
        .expect("failed status"),
        None => {}
    }
    html.push_str(
        "<button type=\"submit\" formaction=\"/reset\" formnovalidate class=\"cancelButton\">Reset</button>\n",
    );
    html.push_str("</div>\n</form>\n</div>\n");
    html
}

/// Read-only table of list items, one row per item keyed by its store id.
pub fn render_entries_table(items: &[PersistedEntry]) -> String {
    let mut html = String::new();
    html.push_str("<table>\n<thead>\n<tr>");
    html.push_str("<th>Application Name</th><th>Application Type</th><th>Contact Email</th>");
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for item in items {
        writeln!(
            html,
            "<tr data-key=\"{}\"><td>{}</td><td>{}</td><td>{}</td></tr>",
            item.id,
            escape_html(item.title.as_deref().unwrap_or_default()),
            escape_html(item.application_type.as_deref().unwrap_or_default()),
            escape_html(item.contact.as_deref().unwrap_or_default()),
        )
        .expect("table row");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_input(
    field: FieldName,
    label: &str,
    input_type: &str,
    value: &str,
    errors: &ValidationErrors,
) -> String {
    let name = field.as_str();
    let message = errors.message(field);
    let class = if message.is_some() { " class=\"error\"" } else { "" };

    let mut html = String::new();
    html.push_str("<div class=\"formGroup\">\n");
    writeln!(html, "<label for=\"{name}\">{label}</label>").expect("label");
    writeln!(
        html,
        "<input type=\"{input_type}\" id=\"{name}\" name=\"{name}\" value=\"{}\"{class}>",
        escape_html(value)
    )
    .expect("input");
    if let Some(message) = message {
        writeln!(html, "<div class=\"errorMessage\">{}</div>", escape_html(message))
            .expect("error message");
    }
    html.push_str("</div>\n");
    html
}

fn render_type_select(selected: ApplicationType, errors: &ValidationErrors) -> String {
    let name = FieldName::ApplicationType.as_str();
    let mut html = String::new();
    html.push_str("<div class=\"formGroup\">\n");
    writeln!(html, "<label for=\"{name}\">Application Type:</label>").expect("label");
    writeln!(html, "<select id=\"{name}\" name=\"{name}\">").expect("select");
    for option in ApplicationType::ALL {
        let marker = if option == selected { " selected" } else { "" };
        writeln!(
            html,
            "<option value=\"{}\"{marker}>{}</option>",
            escape_html(option.as_str()),
            escape_html(option.label())
        )
        .expect("option");
    }
    html.push_str("</select>\n");
    if let Some(message) = errors.message(FieldName::ApplicationType) {
        writeln!(html, "<div class=\"errorMessage\">{}</div>", escape_html(message))
            .expect("error message");
    }
    html.push_str("</div>\n");
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
