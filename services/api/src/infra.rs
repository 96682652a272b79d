use applications_form::config::StoreConfig;
use applications_form::error::AppError;
use applications_form::forms::applications::{
    ListStore, NewEntry, PersistedEntry, SharePointListClient, StoreError,
};
use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// List store kept in process memory, used for demos and offline runs.
#[derive(Default, Clone)]
pub(crate) struct InMemoryListStore {
    items: Arc<Mutex<Vec<PersistedEntry>>>,
}

#[async_trait]
impl ListStore for InMemoryListStore {
    async fn items(&self) -> Result<Vec<PersistedEntry>, StoreError> {
        let guard = self.items.lock().expect("list mutex poisoned");
        Ok(guard.clone())
    }

    async fn create(&self, entry: &NewEntry) -> Result<PersistedEntry, StoreError> {
        let mut guard = self.items.lock().expect("list mutex poisoned");
        let id = guard.last().map(|item| item.id + 1).unwrap_or(1);
        let stored = PersistedEntry {
            id,
            title: Some(entry.title.clone()),
            application_type: Some(entry.application_type.as_str().to_string()),
            contact: Some(entry.contact.clone()),
        };
        guard.push(stored.clone());
        Ok(stored)
    }
}

pub(crate) fn sharepoint_client(config: &StoreConfig) -> Result<SharePointListClient, AppError> {
    let site_url = config.require_site_url()?;
    let client = SharePointListClient::new(site_url, config.list_name.clone());
    Ok(match &config.access_token {
        Some(token) => client.with_access_token(token.clone()),
        None => client,
    })
}
