//! Domain module - the pharmacy record and the duty-date rules
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod duty_date;
pub mod pharmacy;

pub use duty_date::{format_duty_date, resolve_query_date, MORNING_CUTOFF_HOUR};
pub use pharmacy::{Pharmacy, UNKNOWN};
