use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::controller::{ApplicationFormController, LoadOutcome, SubmitOutcome};
use super::domain::{ApplicationType, DraftEntry, FieldName};
use super::store::ListStore;
use super::view::render_page;

type SharedController<S> = Arc<ApplicationFormController<S>>;

/// Values posted by the HTML form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSubmission {
    pub application_name: String,
    pub application_type: String,
    pub contact: String,
}

impl FormSubmission {
    pub fn into_draft(self) -> DraftEntry {
        DraftEntry {
            application_name: self.application_name,
            application_type: ApplicationType::from_input(&self.application_type),
            contact: self.contact,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldUpdate {
    pub value: String,
}

/// Router builder exposing the form page and its JSON counterpart.
pub fn application_router<S>(controller: SharedController<S>) -> Router
where
    S: ListStore + 'static,
{
    Router::new()
        .route("/", get(page_handler::<S>).post(submit_form_handler::<S>))
        .route("/reset", post(reset_form_handler::<S>))
        .route("/api/v1/applications/form", get(state_handler::<S>))
        .route(
            "/api/v1/applications/form/fields/:field",
            put(update_field_handler::<S>),
        )
        .route(
            "/api/v1/applications/form/validate",
            post(validate_handler::<S>),
        )
        .route("/api/v1/applications/form/submit", post(submit_handler::<S>))
        .route("/api/v1/applications/form/cancel", post(cancel_handler::<S>))
        .route("/api/v1/applications/items", get(items_handler::<S>))
        .route(
            "/api/v1/applications/items/reload",
            post(reload_handler::<S>),
        )
        .with_state(controller)
}

fn html_page<S>(controller: &ApplicationFormController<S>) -> Response
where
    S: ListStore + 'static,
{
    let body = render_page(&controller.snapshot());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::TEXT_HTML_UTF_8.as_ref())],
        body,
    )
        .into_response()
}

pub(crate) async fn page_handler<S>(State(controller): State<SharedController<S>>) -> Response
where
    S: ListStore + 'static,
{
    html_page(&controller)
}

pub(crate) async fn submit_form_handler<S>(
    State(controller): State<SharedController<S>>,
    Form(submission): Form<FormSubmission>,
) -> Response
where
    S: ListStore + 'static,
{
    controller.submit_draft(submission.into_draft()).await;
    html_page(&controller)
}

pub(crate) async fn reset_form_handler<S>(State(controller): State<SharedController<S>>) -> Response
where
    S: ListStore + 'static,
{
    controller.cancel();
    html_page(&controller)
}

pub(crate) async fn state_handler<S>(State(controller): State<SharedController<S>>) -> Response
where
    S: ListStore + 'static,
{
    (StatusCode::OK, Json(controller.snapshot())).into_response()
}

pub(crate) async fn update_field_handler<S>(
    State(controller): State<SharedController<S>>,
    Path(field): Path<String>,
    Json(update): Json<FieldUpdate>,
) -> Response
where
    S: ListStore + 'static,
{
    let field = match field.parse::<FieldName>() {
        Ok(field) => field,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::NOT_FOUND, Json(payload)).into_response();
        }
    };

    controller.update_field(field, update.value);
    (StatusCode::OK, Json(controller.snapshot().draft)).into_response()
}

pub(crate) async fn validate_handler<S>(State(controller): State<SharedController<S>>) -> Response
where
    S: ListStore + 'static,
{
    let (valid, errors) = controller.validate();
    let payload = json!({ "valid": valid, "errors": errors });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn submit_handler<S>(State(controller): State<SharedController<S>>) -> Response
where
    S: ListStore + 'static,
{
    match controller.submit().await {
        SubmitOutcome::Saved(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        SubmitOutcome::Invalid(errors) => {
            let payload = json!({ "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        SubmitOutcome::Failed(message) => {
            let payload = json!({ "error": message });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn cancel_handler<S>(State(controller): State<SharedController<S>>) -> Response
where
    S: ListStore + 'static,
{
    controller.cancel();
    (StatusCode::OK, Json(controller.snapshot())).into_response()
}

pub(crate) async fn items_handler<S>(State(controller): State<SharedController<S>>) -> Response
where
    S: ListStore + 'static,
{
    (StatusCode::OK, Json(controller.snapshot().items)).into_response()
}

pub(crate) async fn reload_handler<S>(State(controller): State<SharedController<S>>) -> Response
where
    S: ListStore + 'static,
{
    match controller.load_items().await {
        LoadOutcome::Loaded { count } => {
            (StatusCode::OK, Json(json!({ "count": count }))).into_response()
        }
        LoadOutcome::Failed(message) => {
            let payload = json!({ "error": message });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
