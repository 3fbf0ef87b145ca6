//! Emergency pharmacy (Notdienst) finder
//!
//! Locates on-duty pharmacies for a postal code and date by scraping the
//! LAK Brandenburg duty-roster portal and optionally enriches each record
//! with coordinates from the Nominatim geocoding service.
//!
//! ```no_run
//! use notdienst_finder::{DutyRequest, PharmacyFinder};
//!
//! # async fn lookup() -> Result<(), notdienst_finder::FinderError> {
//! let finder = PharmacyFinder::new()?;
//! let pharmacies = finder
//!     .find_duty_pharmacies(&DutyRequest::new("14467", "Brandenburg"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the public surface
pub use application::finder::{DutyRequest, PharmacyFinder};
pub use domain::pharmacy::Pharmacy;
pub use infrastructure::config::AppConfig;
pub use infrastructure::error::FinderError;
pub use infrastructure::geocoding::{EnrichOptions, GeocodeResolver};
pub use infrastructure::logging::{init_logging, init_logging_with_config};
