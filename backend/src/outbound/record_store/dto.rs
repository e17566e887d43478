//! DTOs for the record store's JSON dialect.
//!
//! Reads decode into these transport DTOs first and then map into domain
//! records in one pass. Writes serialise domain values through the borrowed
//! variants so field names stay in one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::domain::{CityFields, CityId, CityRecord, NewCityRecord};

/// Body of a collection read: `null`, an object keyed by id, or an array
/// when the store has only ever seen integer keys.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CollectionDto {
    Keyed(BTreeMap<String, Value>),
    Indexed(Vec<Value>),
}

impl CollectionDto {
    /// Pair each raw entry with its identifier, dropping null slots.
    pub(super) fn into_entries(self) -> Vec<(String, Value)> {
        match self {
            Self::Keyed(map) => map.into_iter().collect(),
            Self::Indexed(items) => items
                .into_iter()
                .enumerate()
                .filter(|(_, value)| !value.is_null())
                .map(|(index, value)| (index.to_string(), value))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct StoredCityDto {
    city: String,
    country: String,
    continent: String,
    lat: f64,
    lon: f64,
    #[serde(deserialize_with = "whole_seconds")]
    timestamp: i64,
}

/// 2^63, exactly representable as `f64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Accept integer seconds, or a float with no fractional part as written by
/// clients that only have a double type.
fn whole_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(seconds) = number.as_i64() {
        return Ok(seconds);
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&value) => {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "value is whole and inside the i64 range"
            )]
            let seconds = value as i64;
            Ok(seconds)
        }
        _ => Err(serde::de::Error::custom(format!(
            "timestamp `{number}` is not a whole number of seconds"
        ))),
    }
}

impl StoredCityDto {
    pub(super) fn into_domain(self, id: &str) -> Result<CityRecord, String> {
        let id = CityId::new(id).map_err(|err| format!("entry `{id}`: {err}"))?;
        let fields = CityFields::try_from_parts(
            &self.city,
            &self.country,
            &self.continent,
            self.lat,
            self.lon,
        )
        .map_err(|err| format!("entry `{id}`: {err}"))?;
        Ok(CityRecord {
            id,
            fields,
            timestamp: self.timestamp,
        })
    }
}

/// Decode one raw entry into a complete record.
pub(super) fn decode_entry(id: &str, value: Value) -> Result<CityRecord, String> {
    let dto: StoredCityDto =
        serde_json::from_value(value).map_err(|err| format!("entry `{id}`: {err}"))?;
    dto.into_domain(id)
}

/// Body returned by a create call.
#[derive(Debug, Deserialize)]
pub(super) struct CreatedDto {
    pub(super) name: String,
}

/// The five mutable fields as written on update.
#[derive(Debug, Serialize)]
pub(super) struct FieldsDto<'a> {
    city: &'a str,
    country: &'a str,
    continent: &'a str,
    lat: f64,
    lon: f64,
}

impl<'a> From<&'a CityFields> for FieldsDto<'a> {
    fn from(fields: &'a CityFields) -> Self {
        Self {
            city: fields.city(),
            country: fields.country(),
            continent: fields.continent(),
            lat: fields.lat(),
            lon: fields.lon(),
        }
    }
}

/// Full body written on create.
#[derive(Debug, Serialize)]
pub(super) struct NewCityDto<'a> {
    #[serde(flatten)]
    fields: FieldsDto<'a>,
    timestamp: i64,
}

impl<'a> From<&'a NewCityRecord> for NewCityDto<'a> {
    fn from(record: &'a NewCityRecord) -> Self {
        Self {
            fields: FieldsDto::from(&record.fields),
            timestamp: record.timestamp,
        }
    }
}
