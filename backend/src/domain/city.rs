//! City record model.
//!
//! A [`CityRecord`] pairs a store-assigned [`CityId`] with the five mutable
//! [`CityFields`] and an immutable creation timestamp. Values are validated
//! on construction so a record is always complete.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Characters the record store reserves for path syntax.
const FORBIDDEN_ID_CHARS: [char; 6] = ['/', '.', '#', '$', '[', ']'];

/// Validation errors raised while building city values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CityValidationError {
    /// Identifier was empty.
    #[error("city id must not be empty")]
    EmptyId,
    /// Identifier had surrounding whitespace or reserved characters.
    #[error("city id contains characters the record store does not accept")]
    InvalidId,
    /// A required text field was blank once trimmed.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    /// A coordinate was NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFiniteCoordinate { field: &'static str },
}

impl CityValidationError {
    /// The camelCase request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyField { field } | Self::NonFiniteCoordinate { field } => field,
        }
    }
}

/// Store-assigned record identifier.
///
/// ## Invariants
/// - Non-empty, no surrounding whitespace.
/// - Free of `/ . # $ [ ]`, so it can be embedded in a store path.
///
/// # Examples
/// ```
/// use city_locator::domain::CityId;
///
/// let id = CityId::new("-NqK1c2x").expect("valid id");
/// assert_eq!(id.as_ref(), "-NqK1c2x");
/// assert!(CityId::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CityId(String);

impl CityId {
    /// Validate and construct an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, CityValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CityValidationError::EmptyId);
        }
        if id.trim() != id || id.contains(FORBIDDEN_ID_CHARS) {
            return Err(CityValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for CityId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CityId> for String {
    fn from(value: CityId) -> Self {
        value.0
    }
}

impl TryFrom<String> for CityId {
    type Error = CityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The five mutable fields of a city record.
///
/// ## Invariants
/// - `city`, `country` and `continent` are trimmed and non-empty.
/// - `lat` and `lon` are finite. Their range is not checked.
///
/// # Examples
/// ```
/// use city_locator::domain::CityFields;
///
/// let fields = CityFields::try_from_parts(" Lagos ", "Nigeria", "Africa", 6.5244, 3.3792)
///     .expect("valid fields");
/// assert_eq!(fields.city(), "Lagos");
/// assert_eq!(fields.label(), "Lagos (Nigeria)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CityFields {
    city: String,
    country: String,
    continent: String,
    lat: f64,
    lon: f64,
}

impl CityFields {
    /// Validate raw inputs into a field set.
    pub fn try_from_parts(
        city: &str,
        country: &str,
        continent: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Self, CityValidationError> {
        Ok(Self {
            city: required_text(city, "city")?,
            country: required_text(country, "country")?,
            continent: required_text(continent, "continent")?,
            lat: finite(lat, "lat")?,
            lon: finite(lon, "lon")?,
        })
    }

    /// City display name.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Country name.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Continent name.
    pub fn continent(&self) -> &str {
        &self.continent
    }

    /// Latitude.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Selection label, `"{city} ({country})"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.city, self.country)
    }
}

fn required_text(value: &str, field: &'static str) -> Result<String, CityValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CityValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

fn finite(value: f64, field: &'static str) -> Result<f64, CityValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CityValidationError::NonFiniteCoordinate { field })
    }
}

/// A record about to be created: fields plus the creation timestamp.
///
/// The store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCityRecord {
    pub fields: CityFields,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

/// A complete, stored city record.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub id: CityId,
    pub fields: CityFields,
    /// Creation time in seconds since the Unix epoch. Never updated.
    pub timestamp: i64,
}

impl CityRecord {
    /// Attach a store-assigned identifier to a new record.
    pub fn from_new(id: CityId, record: NewCityRecord) -> Self {
        Self {
            id,
            fields: record.fields,
            timestamp: record.timestamp,
        }
    }

    /// Replace the mutable fields, keeping the identifier and timestamp.
    #[must_use]
    pub fn with_fields(self, fields: CityFields) -> Self {
        Self { fields, ..self }
    }
}
