use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;

use super::domain::{NewEntry, PersistedEntry};
use super::store::{ListStore, StoreError};

const NOMETADATA_JSON: &str = "application/json;odata=nometadata";
const SELECTED_FIELDS: &str = "Id,Title,ApplicationType,Contact";

#[derive(Debug, Deserialize)]
struct ItemCollection {
    value: Vec<PersistedEntry>,
}

/// REST client for a single SharePoint list.
#[derive(Debug, Clone)]
pub struct SharePointListClient {
    http: Client,
    site_url: String,
    list_name: String,
    access_token: Option<String>,
}

impl SharePointListClient {
    pub fn new(site_url: impl Into<String>, list_name: impl Into<String>) -> Self {
        Self::with_client(Client::new(), site_url, list_name)
    }

    pub fn with_client(
        http: Client,
        site_url: impl Into<String>,
        list_name: impl Into<String>,
    ) -> Self {
        let site_url = site_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            site_url,
            list_name: list_name.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    /// `.../_api/web/lists/getbytitle('<list>')/items`
    pub fn items_url(&self) -> String {
        format!(
            "{}/_api/web/lists/getbytitle('{}')/items",
            self.site_url,
            odata_string_literal(&self.list_name)
        )
    }

    fn headers(&self, with_body: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(NOMETADATA_JSON));
        if with_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(NOMETADATA_JSON));
            headers.insert(
                HeaderName::from_static("odata-version"),
                HeaderValue::from_static(""),
            );
        }
        headers
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ListStore for SharePointListClient {
    async fn items(&self) -> Result<Vec<PersistedEntry>, StoreError> {
        let request = self
            .http
            .get(self.items_url())
            .query(&[("$select", SELECTED_FIELDS)])
            .headers(self.headers(false));

        let response = ensure_success(self.authorize(request).send().await?).await?;
        let collection: ItemCollection = decode(response).await?;
        Ok(collection.value)
    }

    async fn create(&self, entry: &NewEntry) -> Result<PersistedEntry, StoreError> {
        // Content-Type is set first so `json` keeps the nometadata variant.
        let request = self
            .http
            .post(self.items_url())
            .headers(self.headers(true))
            .json(entry);

        let response = ensure_success(self.authorize(request).send().await?).await?;
        decode(response).await
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| StoreError::Decode(err.to_string()))
}

/// OData string literals escape a single quote by doubling it.
fn odata_string_literal(raw: &str) -> String {
    raw.replace('\'', "''")
}
