//! Pharmacy record with address, contact and optional geocode data
//!
//! The geocode fields (`latitude`, `longitude`, `osm_address`) are populated
//! together by a successful enrichment call and never by plain field access.
//! The raw selected geocode candidate is kept in `osm_data` as an opaque
//! cache so repeated enrichment calls can skip the network round trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel used for fields that could not be parsed from a listing row.
pub const UNKNOWN: &str = "Unbekannt";

/// A single on-duty pharmacy as extracted from a regional duty roster.
///
/// Serializes to a flat key-value shape that round-trips losslessly,
/// including the cached raw geocode payload in `osm_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub name: String,
    pub street: String,
    pub town: String,
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub web: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
    /// Link target of the portal's "directions" anchor, when present.
    #[serde(default)]
    pub gmaps: Option<String>,

    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    /// Display name reported by the geocoder for the resolved location.
    #[serde(default)]
    pub osm_address: Option<String>,
    /// Raw geocode candidate selected for this record. Acts as the lookup
    /// cache; never written back into the contact fields.
    #[serde(default)]
    pub osm_data: Option<Value>,
}

impl Pharmacy {
    /// Create a record with identity and address only; contact and geocode
    /// fields start empty.
    pub fn new(name: &str, street: &str, town: &str) -> Self {
        Self {
            name: name.to_string(),
            street: street.to_string(),
            town: town.to_string(),
            state: None,
            phone: None,
            fax: None,
            web: None,
            mail: None,
            gmaps: None,
            latitude: None,
            longitude: None,
            osm_address: None,
            osm_data: None,
        }
    }

    /// Whether this record carries a complete set of geocode fields.
    pub fn has_geocode(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some() && self.osm_address.is_some()
    }

    /// Latitude/longitude pair, available once the record has been geocoded.
    pub fn coordinates(&self) -> Option<(&str, &str)> {
        match (self.latitude.as_deref(), self.longitude.as_deref()) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Pharmacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.name,
            self.street,
            self.town,
            self.state.as_deref().unwrap_or("-")
        )
    }
}
