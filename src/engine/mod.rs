//! Pure roster and scoring logic.
//!
//! Nothing in here performs I/O; callers materialize the feed snapshot and stored state first.

pub mod roster;
pub mod scoring;

pub use roster::RosterEngine;
pub use scoring::compute_score;
