//! Database seeding functionality
//!
//! Populates the competition catalogue at startup. Ingestion only links
//! matches to competitions that already exist, so an empty catalogue means
//! every feed record is skipped.

pub mod competition;

pub use competition::{DEFAULT_COMPETITIONS, seed_competitions};
