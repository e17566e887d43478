//! Read-only lookup over a small built-in table of cities.

use serde::Serialize;

/// One row of the built-in directory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectoryEntry {
    pub name: &'static str,
    pub country: &'static str,
    pub continent: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const BUILTIN: &[DirectoryEntry] = &[
    DirectoryEntry {
        name: "Lagos",
        country: "Nigeria",
        continent: "Africa",
        lat: 6.5244,
        lon: 3.3792,
    },
    DirectoryEntry {
        name: "Nairobi",
        country: "Kenya",
        continent: "Africa",
        lat: -1.2921,
        lon: 36.8219,
    },
    DirectoryEntry {
        name: "Mumbai",
        country: "India",
        continent: "Asia",
        lat: 19.0760,
        lon: 72.8777,
    },
    DirectoryEntry {
        name: "Tokyo",
        country: "Japan",
        continent: "Asia",
        lat: 35.6762,
        lon: 139.6503,
    },
    DirectoryEntry {
        name: "Paris",
        country: "France",
        continent: "Europe",
        lat: 48.8566,
        lon: 2.3522,
    },
    DirectoryEntry {
        name: "London",
        country: "United Kingdom",
        continent: "Europe",
        lat: 51.5074,
        lon: -0.1278,
    },
    DirectoryEntry {
        name: "New York",
        country: "United States",
        continent: "North America",
        lat: 40.7128,
        lon: -74.0060,
    },
    DirectoryEntry {
        name: "São Paulo",
        country: "Brazil",
        continent: "South America",
        lat: -23.5505,
        lon: -46.6333,
    },
    DirectoryEntry {
        name: "Sydney",
        country: "Australia",
        continent: "Oceania",
        lat: -33.8688,
        lon: 151.2093,
    },
];

/// Fixed in-memory city table.
///
/// # Examples
/// ```
/// use city_locator::domain::CityDirectory;
///
/// let directory = CityDirectory::builtin();
/// let entry = directory.lookup("  paris ").expect("Paris is built in");
/// assert_eq!(entry.country, "France");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CityDirectory {
    entries: &'static [DirectoryEntry],
}

impl CityDirectory {
    /// The table shipped with the service.
    pub fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    /// Exact, case-insensitive match on the trimmed name.
    pub fn lookup(&self, name: &str) -> Option<&'static DirectoryEntry> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.name.to_lowercase() == wanted)
    }

    /// Every name, in table order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }
}

impl Default for CityDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}
