//! Process-local record store used for development and tests.
//!
//! Identifiers are minted from a monotonic counter so they sort in creation
//! order and are never reused within the process.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::ports::{CityRecordStore, CityRecordStoreError};
use crate::domain::{CityFields, CityId, CityRecord, NewCityRecord};

/// In-memory implementation of [`CityRecordStore`].
#[derive(Debug, Default)]
pub struct InMemoryCityRecordStore {
    records: Mutex<BTreeMap<CityId, CityRecord>>,
    next_id: AtomicU64,
}

impl InMemoryCityRecordStore {
    /// Create a store pre-populated with `records`.
    ///
    /// The id counter starts past the highest seeded `mem-` sequence so
    /// later creates never collide with a seeded record.
    pub fn with_records(records: impl IntoIterator<Item = CityRecord>) -> Self {
        let records: BTreeMap<CityId, CityRecord> = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        let highest = records.keys().filter_map(minted_sequence).max().unwrap_or(0);
        Self {
            records: Mutex::new(records),
            next_id: AtomicU64::new(highest),
        }
    }

    fn with_guard<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<CityId, CityRecord>) -> T,
    ) -> Result<T, CityRecordStoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| CityRecordStoreError::transport("memory store lock poisoned"))?;
        Ok(f(&mut guard))
    }

    fn mint_id(&self) -> Result<CityId, CityRecordStoreError> {
        let sequence = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        CityId::new(format!("{MINTED_PREFIX}{sequence:012}"))
            .map_err(|err| CityRecordStoreError::decode(format!("minted invalid id: {err}")))
    }
}

const MINTED_PREFIX: &str = "mem-";

fn minted_sequence(id: &CityId) -> Option<u64> {
    id.as_ref().strip_prefix(MINTED_PREFIX)?.parse().ok()
}

#[async_trait]
impl CityRecordStore for InMemoryCityRecordStore {
    async fn fetch_all(&self) -> Result<Vec<CityRecord>, CityRecordStoreError> {
        self.with_guard(|records| records.values().cloned().collect())
    }

    async fn fetch_one(&self, id: &CityId) -> Result<Option<CityRecord>, CityRecordStoreError> {
        self.with_guard(|records| records.get(id).cloned())
    }

    async fn create(&self, record: &NewCityRecord) -> Result<CityId, CityRecordStoreError> {
        let id = self.mint_id()?;
        let stored = CityRecord::from_new(id.clone(), record.clone());
        self.with_guard(|records| {
            records.insert(id.clone(), stored);
        })?;
        Ok(id)
    }

    async fn replace_fields(
        &self,
        id: &CityId,
        fields: &CityFields,
    ) -> Result<(), CityRecordStoreError> {
        self.with_guard(|records| {
            if let Some(record) = records.get_mut(id) {
                record.fields = fields.clone();
            }
        })
    }

    async fn remove(&self, id: &CityId) -> Result<(), CityRecordStoreError> {
        self.with_guard(|records| {
            records.remove(id);
        })
    }
}
