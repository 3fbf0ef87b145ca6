//! Public query surface and region dispatch
//!
//! [`PharmacyFinder`] routes a (postal code, state) pair to the registered
//! regional provider. Routing failures are the only hard error on this
//! surface; everything downstream degrades to sentinel records.

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::pharmacy::Pharmacy;
use crate::infrastructure::config::{defaults, AppConfig};
use crate::infrastructure::error::FinderError;
use crate::infrastructure::regions::{LakbbProvider, RegionProvider};

/// A duty-pharmacy lookup request.
///
/// `limit` defaults to the configured result limit and `morning_change`
/// defaults to on, matching the portal's 08:00 handover rule.
#[derive(Debug, Clone)]
pub struct DutyRequest {
    pub plz: String,
    pub state: String,
    pub date: Option<DateTime<Local>>,
    pub limit: Option<usize>,
    pub morning_change: bool,
}

impl DutyRequest {
    pub fn new(plz: &str, state: &str) -> Self {
        Self {
            plz: plz.to_string(),
            state: state.to_string(),
            date: None,
            limit: None,
            morning_change: defaults::MORNING_CHANGE,
        }
    }

    /// Look up for a specific timestamp instead of now.
    pub fn with_date(mut self, date: DateTime<Local>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Disable the 08:00 morning handover shift.
    pub fn without_morning_change(mut self) -> Self {
        self.morning_change = false;
        self
    }
}

/// Registry-based dispatcher over regional duty-roster providers.
pub struct PharmacyFinder {
    regions: HashMap<String, Arc<dyn RegionProvider>>,
    default_limit: usize,
}

impl PharmacyFinder {
    /// Create a finder with the default configuration and the built-in
    /// LAK Brandenburg provider.
    pub fn new() -> Result<Self, FinderError> {
        Self::with_config(&AppConfig::default())
    }

    pub fn with_config(config: &AppConfig) -> Result<Self, FinderError> {
        let mut finder = Self {
            regions: HashMap::new(),
            default_limit: config.listing.default_limit,
        };

        let lakbb = LakbbProvider::new(&config.listing)
            .map_err(|e| FinderError::configuration(e.to_string()))?;
        finder.register(Arc::new(lakbb));

        Ok(finder)
    }

    /// Register a provider under all of its state aliases.
    pub fn register(&mut self, provider: Arc<dyn RegionProvider>) {
        for alias in provider.state_aliases() {
            self.regions
                .insert(alias.to_lowercase(), Arc::clone(&provider));
        }
    }

    /// State aliases with a registered provider.
    pub fn supported_states(&self) -> Vec<&str> {
        let mut states: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        states.sort_unstable();
        states
    }

    /// Look up the on-duty pharmacies for a request.
    ///
    /// Fails immediately with [`FinderError::UnsupportedRegion`] when the
    /// state has no registered provider; no network call is made in that
    /// case. Otherwise always yields a non-empty list in source row order.
    pub async fn find_duty_pharmacies(
        &self,
        request: &DutyRequest,
    ) -> Result<Vec<Pharmacy>, FinderError> {
        let key = request.state.trim().to_lowercase();
        let provider = self
            .regions
            .get(&key)
            .ok_or_else(|| FinderError::unsupported_region(&request.state))?;

        info!(
            "looking up duty pharmacies for plz {} via {}",
            request.plz,
            provider.region_name()
        );

        let pharmacies = provider
            .fetch_duty_pharmacies(
                &request.plz,
                request.date,
                request.limit.unwrap_or(self.default_limit),
                request.morning_change,
            )
            .await;

        Ok(pharmacies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubProvider;

    #[async_trait]
    impl RegionProvider for StubProvider {
        fn region_name(&self) -> &'static str {
            "Teststaat"
        }

        fn state_aliases(&self) -> &'static [&'static str] {
            &["teststaat", "ts"]
        }

        async fn fetch_duty_pharmacies(
            &self,
            plz: &str,
            _date: Option<DateTime<Local>>,
            limit: usize,
            _morning_change: bool,
        ) -> Vec<Pharmacy> {
            vec![Pharmacy::new(
                &format!("Stub {} (limit {})", plz, limit),
                "Street",
                "Town",
            )]
        }
    }

    #[tokio::test]
    async fn unsupported_state_fails_before_any_fetch() {
        let finder = PharmacyFinder::new().unwrap();
        let request = DutyRequest::new("80331", "Bayern");

        let err = finder.find_duty_pharmacies(&request).await.unwrap_err();
        assert!(matches!(
            err,
            FinderError::UnsupportedRegion { ref state } if state == "Bayern"
        ));
    }

    #[tokio::test]
    async fn state_matching_is_case_insensitive() {
        let mut finder = PharmacyFinder::new().unwrap();
        finder.register(Arc::new(StubProvider));

        for state in ["TestStaat", "TESTSTAAT", " teststaat "] {
            let request = DutyRequest::new("14467", state);
            let result = finder.find_duty_pharmacies(&request).await.unwrap();
            assert_eq!(result.len(), 1);
        }
    }

    #[tokio::test]
    async fn aliases_route_to_the_same_provider() {
        let mut finder = PharmacyFinder::new().unwrap();
        finder.register(Arc::new(StubProvider));

        let by_name = finder
            .find_duty_pharmacies(&DutyRequest::new("14467", "Teststaat"))
            .await
            .unwrap();
        let by_alias = finder
            .find_duty_pharmacies(&DutyRequest::new("14467", "TS"))
            .await
            .unwrap();
        assert_eq!(by_name[0].name, by_alias[0].name);
    }

    #[tokio::test]
    async fn default_limit_comes_from_config() {
        let mut config = AppConfig::default();
        config.listing.default_limit = 9;
        let mut finder = PharmacyFinder::with_config(&config).unwrap();
        finder.register(Arc::new(StubProvider));

        let result = finder
            .find_duty_pharmacies(&DutyRequest::new("14467", "ts"))
            .await
            .unwrap();
        assert_eq!(result[0].name, "Stub 14467 (limit 9)");

        let result = finder
            .find_duty_pharmacies(&DutyRequest::new("14467", "ts").with_limit(2))
            .await
            .unwrap();
        assert_eq!(result[0].name, "Stub 14467 (limit 2)");
    }

    #[test]
    fn builtin_provider_covers_berlin_and_brandenburg() {
        let finder = PharmacyFinder::new().unwrap();
        let states = finder.supported_states();
        assert!(states.contains(&"berlin"));
        assert!(states.contains(&"brandenburg"));
    }
}
