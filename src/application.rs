//! Application layer module
//!
//! This module contains the public query surface that orchestrates the
//! domain logic and the regional providers.

pub mod finder;

pub use finder::{DutyRequest, PharmacyFinder};
