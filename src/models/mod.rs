//! Data models for the gameweek roster service.
//!
//! Feed-side values (players, snapshots), persisted per-user state and the HTTP contract.

mod player;
mod roster;
mod score;

pub use player::*;
pub use roster::*;
pub use score::*;
