//! Cache key type shared by listing cache adapters.

use thiserror::Error;

use crate::domain::SessionId;

/// Operation segment for the record listing.
const LIST_CITIES: &str = "cities:list";

/// Cache key derived from an operation and its parameters.
///
/// # Examples
/// ```
/// use city_locator::domain::ports::CacheKey;
///
/// let key = CacheKey::new("cities:list").expect("valid key");
/// assert_eq!(key.as_str(), "cities:list");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a key after checking it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key for the full listing, optionally partitioned by session.
    pub fn city_listing(session: Option<&SessionId>) -> Self {
        match session {
            Some(id) => Self(format!("session:{id}:{LIST_CITIES}")),
            None => Self(LIST_CITIES.to_owned()),
        }
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned when constructing [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key has leading or trailing whitespace.
    #[error("cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}
