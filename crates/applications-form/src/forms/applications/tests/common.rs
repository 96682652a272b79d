use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::response::Response;

use crate::forms::applications::domain::{
    ApplicationType, DraftEntry, FieldName, NewEntry, PersistedEntry,
};
use crate::forms::applications::store::{ListStore, StoreError};
use crate::forms::applications::validation::ValidationPolicy;
use crate::forms::applications::ApplicationFormController;

/// List store double that records every call and can be told to fail.
#[derive(Default)]
pub(super) struct RecordingStore {
    items: Mutex<Vec<PersistedEntry>>,
    created: Mutex<Vec<NewEntry>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_creates: AtomicBool,
}

impl RecordingStore {
    pub(super) fn with_items(items: Vec<PersistedEntry>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub(super) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(super) fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(super) fn created(&self) -> Vec<NewEntry> {
        self.created.lock().expect("created mutex").clone()
    }
}

#[async_trait]
impl ListStore for RecordingStore {
    async fn items(&self) -> Result<Vec<PersistedEntry>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 503,
                body: "list unavailable".to_string(),
            });
        }
        Ok(self.items.lock().expect("items mutex").clone())
    }

    async fn create(&self, entry: &NewEntry) -> Result<PersistedEntry, StoreError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection reset".to_string()));
        }
        self.created.lock().expect("created mutex").push(entry.clone());

        let mut items = self.items.lock().expect("items mutex");
        let stored = PersistedEntry {
            id: items.iter().map(|item| item.id).max().unwrap_or(0) + 1,
            title: Some(entry.title.clone()),
            application_type: Some(entry.application_type.as_str().to_string()),
            contact: Some(entry.contact.clone()),
        };
        items.push(stored.clone());
        Ok(stored)
    }
}

pub(super) fn persisted(id: u64, title: &str) -> PersistedEntry {
    PersistedEntry {
        id,
        title: Some(title.to_string()),
        application_type: Some("COTS".to_string()),
        contact: Some(format!("owner{id}@example.com")),
    }
}

pub(super) fn draft(name: &str, kind: ApplicationType, contact: &str) -> DraftEntry {
    DraftEntry {
        application_name: name.to_string(),
        application_type: kind,
        contact: contact.to_string(),
    }
}

pub(super) fn build_controller(
    store: RecordingStore,
) -> (Arc<ApplicationFormController<RecordingStore>>, Arc<RecordingStore>) {
    let store = Arc::new(store);
    let controller = Arc::new(ApplicationFormController::new(
        store.clone(),
        ValidationPolicy::default(),
    ));
    (controller, store)
}

pub(super) fn fill(controller: &ApplicationFormController<RecordingStore>, entry: &DraftEntry) {
    controller.update_field(FieldName::ApplicationName, entry.application_name.clone());
    controller.update_field(FieldName::ApplicationType, entry.application_type.as_str());
    controller.update_field(FieldName::Contact, entry.contact.clone());
}

pub(super) async fn read_body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> serde_json::Value {
    serde_json::from_str(&read_body(response).await).expect("json body")
}

/// Shared buffer that a test subscriber writes formatted log lines into.
#[derive(Clone, Default)]
pub(super) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(super) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log mutex")).into_owned()
    }

    pub(super) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log mutex").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
