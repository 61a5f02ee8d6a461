//! # Repository Layer
//!
//! Repository implementations that encapsulate SeaORM operations for the
//! highlights entities.

pub mod competition;
pub mod matches;
pub mod team;
pub mod video;
pub mod web_vital;

pub use competition::CompetitionRepository;
pub use matches::{MatchRepository, MatchUpsert};
pub use team::TeamRepository;
pub use video::{VideoRepository, VideoRow, VideoScope, VideoUpsert, VideoWrite};
pub use web_vital::WebVitalRepository;
