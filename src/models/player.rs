//! Player records as published by the upstream feed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Player identifier as issued by the feed, e.g. `J34531`.
pub type PlayerId = String;

/// Playing position.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Position {
    GK,
    DF,
    MF,
    FW,
}

impl Position {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GK" => Some(Position::GK),
            "DF" => Some(Position::DF),
            "MF" => Some(Position::MF),
            "FW" => Some(Position::FW),
            _ => None,
        }
    }
}

/// One player's data from a single feed fetch.
///
/// `current_score` and `next_price` are `None` until the week's results are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub current_price: i64,
    pub next_price: Option<i64>,
    pub current_score: Option<i64>,
}

/// All players from one feed fetch, tagged with the feed's declared gameweek.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub gameweek: String,
    pub players: HashMap<PlayerId, PlayerRecord>,
}

impl FeedSnapshot {
    pub fn new(gameweek: impl Into<String>) -> Self {
        Self {
            gameweek: gameweek.into(),
            players: HashMap::new(),
        }
    }

    pub fn insert(&mut self, player: PlayerRecord) {
        self.players.insert(player.id.clone(), player);
    }

    pub fn get(&self, id: &str) -> Option<&PlayerRecord> {
        self.players.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parse() {
        assert_eq!(Position::from_str("gk"), Some(Position::GK));
        assert_eq!(Position::from_str(" FW "), Some(Position::FW));
        assert_eq!(Position::from_str("ST"), None);
    }
}
