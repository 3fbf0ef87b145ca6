//! Regional duty-roster providers
//!
//! Each region implements [`RegionProvider`], a fetch+parse capability the
//! dispatcher routes to by normalized state name. Adding a region means
//! implementing the trait and registering it; dispatch logic stays untouched.

pub mod lakbb;

pub use lakbb::{LakbbParser, LakbbProvider};

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::domain::pharmacy::Pharmacy;

/// A regional duty-roster source: fetches and parses the on-duty pharmacies
/// for one portal.
#[async_trait]
pub trait RegionProvider: Send + Sync {
    /// Region label stamped on records produced by this provider.
    fn region_name(&self) -> &'static str;

    /// Lowercase state names routed to this provider.
    fn state_aliases(&self) -> &'static [&'static str];

    /// Fetch the on-duty pharmacies for a postal code.
    ///
    /// Never fails: fetch or parse problems degrade to a single sentinel
    /// placeholder record so callers always get a non-empty list.
    async fn fetch_duty_pharmacies(
        &self,
        plz: &str,
        date: Option<DateTime<Local>>,
        limit: usize,
        morning_change: bool,
    ) -> Vec<Pharmacy>;
}
