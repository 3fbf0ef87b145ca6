//! Error taxonomy for the finder
//!
//! Only [`FinderError::UnsupportedRegion`] ever reaches a caller of the
//! public query surface. Everything on the scraping and geocoding paths
//! degrades to sentinel records or absent fields and is merely logged;
//! [`ScrapeError`] exists so those paths can report *why* they degraded.

use thiserror::Error;

/// Hard failures surfaced to callers.
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("state '{state}' is currently not supported")]
    UnsupportedRegion { state: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl FinderError {
    pub fn unsupported_region(state: &str) -> Self {
        Self::UnsupportedRegion {
            state: state.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Failures on the fetch path. These never cross the public surface; the
/// region provider maps them to a placeholder record and the geocoder maps
/// them to "no geocode data".
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("HTTP error {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("empty response from {url}")]
    EmptyResponse { url: String },

    #[error("could not decode response from {url}: {reason}")]
    InvalidBody { url: String, reason: String },
}

impl ScrapeError {
    pub fn request_failed(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::RequestFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_body(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidBody {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_region_names_the_state() {
        let err = FinderError::unsupported_region("Bayern");
        assert_eq!(err.to_string(), "state 'Bayern' is currently not supported");
    }

    #[test]
    fn scrape_errors_carry_the_url() {
        let err = ScrapeError::HttpStatus {
            status: 503,
            url: "https://example.com".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("example.com"));
    }
}
