//! Infrastructure layer for HTTP fetching, HTML parsing and external integrations
//!
//! This module provides the portal scraping, geocoding, configuration and
//! logging infrastructure behind the application layer.

pub mod config;
pub mod error;
pub mod geocoding;
pub mod http_client;
pub mod logging;
pub mod regions;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, GeocodingConfig, ListingConfig, LoggingConfig};
pub use error::{FinderError, ScrapeError};
pub use geocoding::{EnrichOptions, GeocodeResolver};
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{init_logging, init_logging_with_config};
pub use regions::{LakbbParser, LakbbProvider, RegionProvider};
