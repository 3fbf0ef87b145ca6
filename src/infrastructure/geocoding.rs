//! Nominatim (OpenStreetMap) geocoding and record enrichment
//!
//! Reconciles a pharmacy's free-text postal address against the geocoder's
//! fuzzy candidate list and maps the selected candidate back onto the record.
//! The raw selected candidate is cached on the record (`osm_data`) so
//! repeated enrichment calls skip the network unless explicitly bypassed.
//!
//! No failure on this path ever reaches the caller: transport errors,
//! timeouts and empty candidate lists all degrade to "no geocode data" and
//! are logged.

use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::pharmacy::Pharmacy;
use crate::infrastructure::config::{nominatim, GeocodingConfig};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};

/// Options for a single enrichment call.
#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
    /// Re-fetch even when the record already carries a cached candidate.
    pub overwrite_cache: bool,
    /// Overwrite the record's street/town/state from the candidate's
    /// address fields. Coordinate reads should leave this off so a lookup
    /// never mutates address fields as a side effect.
    pub fix_data: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            overwrite_cache: false,
            fix_data: true,
        }
    }
}

impl EnrichOptions {
    /// Coordinate-only lookup: cache-friendly and address-preserving.
    pub fn coordinates_only() -> Self {
        Self {
            overwrite_cache: false,
            fix_data: false,
        }
    }
}

/// Geocoding client with candidate disambiguation.
pub struct GeocodeResolver {
    http: HttpClient,
    search_url: String,
    ot_qualifier_re: Regex,
}

impl GeocodeResolver {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let http = HttpClient::with_config(HttpClientConfig {
            timeout_seconds: config.request_timeout_seconds,
            user_agent: config.user_agent.clone(),
            referer: None,
        })?;

        Ok(Self {
            http,
            search_url: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                nominatim::SEARCH_PATH
            ),
            // "OT <placename>" marks an Ortsteil (locality sub-part) and
            // degrades geocoding precision, so it is stripped before lookup.
            ot_qualifier_re: Regex::new(r"OT\s+\S+\s*")?,
        })
    }

    /// Build the free-text query for a record's address.
    pub fn build_query(&self, pharmacy: &Pharmacy) -> String {
        self.strip_ot_qualifier(&format!("{}, {}", pharmacy.street, pharmacy.town))
    }

    fn strip_ot_qualifier(&self, text: &str) -> String {
        self.ot_qualifier_re.replace_all(text, "").trim().to_string()
    }

    /// Pick the best candidate from the geocoder's response.
    ///
    /// First candidate whose road contains the query street and whose
    /// city/town contains the query town wins; with no such candidate the
    /// first result is used as a best-effort fallback. The OT qualifier is
    /// stripped from the match terms just as it is from the issued query,
    /// so an OT-qualified town can still match a candidate.
    pub fn select_candidate(
        &self,
        candidates: Vec<Value>,
        street: &str,
        town: &str,
    ) -> Option<Value> {
        if candidates.is_empty() {
            return None;
        }

        let street = self.strip_ot_qualifier(street);
        let town = self.strip_ot_qualifier(town);
        let (street, town) = (street.as_str(), town.as_str());

        let matched = candidates.iter().position(|candidate| {
            let road = candidate["address"]["road"].as_str().unwrap_or("");
            let city = candidate["address"]["city"]
                .as_str()
                .or_else(|| candidate["address"]["town"].as_str())
                .unwrap_or("");
            road.contains(street) && city.contains(town)
        });

        match matched {
            Some(index) => candidates.into_iter().nth(index),
            None => {
                debug!(
                    "no road/city match for '{}, {}', falling back to first candidate",
                    street, town
                );
                candidates.into_iter().next()
            }
        }
    }

    /// Populate the record's geocode fields, fetching from the geocoder
    /// unless a cached candidate is already present.
    ///
    /// Returns whether the record carries geocode data afterwards. On any
    /// failure the record is left untouched.
    pub async fn ensure_geocoded(&self, pharmacy: &mut Pharmacy, options: EnrichOptions) -> bool {
        if pharmacy.osm_data.is_none() || options.overwrite_cache {
            let query = self.build_query(pharmacy);

            let candidates = match self.request_candidates(&query).await {
                Some(candidates) => candidates,
                None => return pharmacy.has_geocode(),
            };

            let selected =
                match self.select_candidate(candidates, &pharmacy.street, &pharmacy.town) {
                    Some(candidate) if candidate_is_complete(&candidate) => candidate,
                    Some(_) => {
                        warn!("geocode candidate for '{}' lacks coordinates", query);
                        return pharmacy.has_geocode();
                    }
                    None => {
                        debug!("geocoder returned no candidates for '{}'", query);
                        return pharmacy.has_geocode();
                    }
                };

            pharmacy.osm_data = Some(selected);
        }

        if let Some(data) = pharmacy.osm_data.clone() {
            apply_candidate(pharmacy, &data, options.fix_data);
        }

        pharmacy.has_geocode()
    }

    async fn request_candidates(&self, query: &str) -> Option<Vec<Value>> {
        let params = [
            ("q", query),
            ("format", "json"),
            ("polygon", "1"),
            ("addressdetails", "1"),
        ];

        match self.http.fetch_json::<Vec<Value>>(&self.search_url, &params).await {
            Ok(candidates) => Some(candidates),
            Err(e) => {
                warn!("geocode request for '{}' failed: {}", query, e);
                None
            }
        }
    }
}

/// A usable candidate must carry coordinates and a display name; the three
/// geocode fields on the record are only ever set together.
fn candidate_is_complete(candidate: &Value) -> bool {
    json_string(&candidate["lat"]).is_some()
        && json_string(&candidate["lon"]).is_some()
        && json_string(&candidate["display_name"]).is_some()
}

fn apply_candidate(pharmacy: &mut Pharmacy, data: &Value, fix_data: bool) {
    pharmacy.latitude = json_string(&data["lat"]);
    pharmacy.longitude = json_string(&data["lon"]);
    pharmacy.osm_address = json_string(&data["display_name"]);

    if fix_data {
        let address = &data["address"];
        if let Some(road) = address["road"].as_str() {
            pharmacy.street = match address["house_number"].as_str() {
                Some(number) => format!("{} {}", road, number),
                None => road.to_string(),
            };
        }
        if let Some(town) = address["town"].as_str() {
            pharmacy.town = town.to_string();
        }
        if let Some(state) = address["state"].as_str() {
            pharmacy.state = Some(state.to_string());
        }
    }
}

/// Nominatim serves lat/lon as strings, but tolerate numbers as well.
fn json_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
