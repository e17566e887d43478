//! Reqwest-backed adapter for a REST document store.
//!
//! The store exposes a collection as `{base}/{collection}.json` and each
//! record as `{base}/{collection}/{id}.json`. The static credential travels
//! as the `auth` query parameter on every call. This adapter owns transport
//! details only: URL construction, status mapping and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroizing;

use super::dto::{CollectionDto, CreatedDto, FieldsDto, NewCityDto, decode_entry};
use crate::domain::ports::{CityRecordStore, CityRecordStoreError};
use crate::domain::{CityFields, CityId, CityRecord, NewCityRecord};

const AUTH_QUERY_PARAM: &str = "auth";

/// Errors raised while building a [`RestCityRecordStore`].
#[derive(Debug, Error)]
pub enum RestStoreConfigError {
    /// Collection path has no non-empty segment.
    #[error("store collection path must not be empty")]
    EmptyCollection,
    /// Base URL cannot carry path segments (for example `mailto:`).
    #[error("store URL `{0}` cannot be used as a base")]
    CannotBeABase(String),
    /// HTTP client construction failed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Record store adapter speaking the REST dialect over HTTPS.
pub struct RestCityRecordStore {
    client: Client,
    base: Url,
    collection: Vec<String>,
    auth: Zeroizing<String>,
}

impl RestCityRecordStore {
    /// Build an adapter for `collection` under `base`.
    ///
    /// `timeout` bounds each call; `None` keeps the client default.
    ///
    /// ```rust,no_run
    /// # use city_locator::outbound::record_store::RestCityRecordStore;
    /// # use url::Url;
    /// # use zeroize::Zeroizing;
    /// let base = Url::parse("https://example-db.example.com").expect("valid URL");
    /// let store = RestCityRecordStore::new(base, "cities", Zeroizing::new("token".into()), None);
    /// assert!(store.is_ok());
    /// ```
    ///
    /// # Errors
    /// Returns [`RestStoreConfigError`] when the collection is blank, the base
    /// URL cannot hold a path, or the client cannot be constructed.
    pub fn new(
        base: Url,
        collection: &str,
        auth: Zeroizing<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, RestStoreConfigError> {
        if base.cannot_be_a_base() {
            return Err(RestStoreConfigError::CannotBeABase(base.to_string()));
        }
        let collection: Vec<String> = collection
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        if collection.is_empty() {
            return Err(RestStoreConfigError::EmptyCollection);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base,
            collection,
            auth,
        })
    }

    fn collection_url(&self) -> Result<Url, CityRecordStoreError> {
        self.endpoint(None)
    }

    fn record_url(&self, id: &CityId) -> Result<Url, CityRecordStoreError> {
        self.endpoint(Some(id))
    }

    fn endpoint(&self, id: Option<&CityId>) -> Result<Url, CityRecordStoreError> {
        let mut url = self.base.clone();
        url.set_query(None);
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                CityRecordStoreError::transport("store URL cannot be used as a base")
            })?;
            segments.pop_if_empty();
            let (last, parents) = self
                .collection
                .split_last()
                .ok_or_else(|| CityRecordStoreError::transport("store collection is empty"))?;
            segments.extend(parents);
            match id {
                None => {
                    segments.push(&format!("{last}.json"));
                }
                Some(id) => {
                    segments.push(last);
                    segments.push(&format!("{id}.json"));
                }
            }
        }
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, CityRecordStoreError> {
        let response = request
            .query(&[(AUTH_QUERY_PARAM, self.auth.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl CityRecordStore for RestCityRecordStore {
    async fn fetch_all(&self) -> Result<Vec<CityRecord>, CityRecordStoreError> {
        let url = self.collection_url()?;
        let body = self.execute(self.client.get(url)).await?;
        parse_collection(&body)
    }

    async fn fetch_one(&self, id: &CityId) -> Result<Option<CityRecord>, CityRecordStoreError> {
        let url = self.record_url(id)?;
        let body = self.execute(self.client.get(url)).await?;
        let value: serde_json::Value = serde_json::from_slice(&body).map_err(|error| {
            CityRecordStoreError::decode(format!("invalid record JSON payload: {error}"))
        })?;
        if value.is_null() {
            return Ok(None);
        }
        match decode_entry(id.as_ref(), value) {
            Ok(record) => Ok(Some(record)),
            Err(reason) => {
                warn!(%reason, "treating malformed store entry as absent");
                Ok(None)
            }
        }
    }

    async fn create(&self, record: &NewCityRecord) -> Result<CityId, CityRecordStoreError> {
        let url = self.collection_url()?;
        let body = self
            .execute(self.client.post(url).json(&NewCityDto::from(record)))
            .await?;
        let created: CreatedDto = serde_json::from_slice(&body).map_err(|error| {
            CityRecordStoreError::decode(format!("invalid create response: {error}"))
        })?;
        CityId::new(created.name).map_err(|error| {
            CityRecordStoreError::decode(format!("store assigned an unusable id: {error}"))
        })
    }

    async fn replace_fields(
        &self,
        id: &CityId,
        fields: &CityFields,
    ) -> Result<(), CityRecordStoreError> {
        let url = self.record_url(id)?;
        self.execute(self.client.patch(url).json(&FieldsDto::from(fields)))
            .await?;
        Ok(())
    }

    async fn remove(&self, id: &CityId) -> Result<(), CityRecordStoreError> {
        let url = self.record_url(id)?;
        self.execute(self.client.delete(url)).await?;
        Ok(())
    }
}

fn parse_collection(body: &[u8]) -> Result<Vec<CityRecord>, CityRecordStoreError> {
    let decoded: Option<CollectionDto> = serde_json::from_slice(body).map_err(|error| {
        CityRecordStoreError::decode(format!("invalid collection JSON payload: {error}"))
    })?;
    let Some(collection) = decoded else {
        return Ok(Vec::new());
    };

    let mut records: Vec<CityRecord> = collection
        .into_entries()
        .into_iter()
        .filter_map(|(id, value)| match decode_entry(&id, value) {
            Ok(record) => Some(record),
            Err(reason) => {
                warn!(%reason, "skipping malformed store entry");
                None
            }
        })
        .collect();
    records.sort_by(|left, right| left.id.as_ref().cmp(right.id.as_ref()));
    debug!(count = records.len(), "decoded city records");
    Ok(records)
}

fn map_transport_error(error: reqwest::Error) -> CityRecordStoreError {
    // The URL carries the credential; keep it out of messages.
    let error = error.without_url();
    if error.is_timeout() {
        CityRecordStoreError::timeout(error.to_string())
    } else {
        CityRecordStoreError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CityRecordStoreError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        preview
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CityRecordStoreError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => CityRecordStoreError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
