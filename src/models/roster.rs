//! Roster models: persisted per-user state and the roster HTTP contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PlayerId, Position};

/// A player held on a user's roster.
///
/// `price` is fixed when the player is acquired and refunded unchanged on deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: PlayerId,
    #[serde(default)]
    pub is_substitute: bool,
    #[serde(default)]
    pub is_captain: bool,
    pub name: String,
    pub position: Position,
    pub price: i64,
}

/// Roster and remaining budget for one `(gameweek, user_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserGameweekState {
    pub gameweek: String,
    pub roster: BTreeMap<PlayerId, RosterEntry>,
    pub bank_money: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserGameweekState {
    /// Empty roster holding the full starting budget.
    pub fn empty(gameweek: impl Into<String>, starting_budget: i64) -> Self {
        Self {
            gameweek: gameweek.into(),
            roster: BTreeMap::new(),
            bank_money: starting_budget,
            updated_at: None,
        }
    }

    /// Sum of acquisition prices across the roster.
    pub fn total_value(&self) -> i64 {
        self.roster.values().map(|entry| entry.price).sum()
    }
}

/// Query parameters for reading a stored roster.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterQuery {
    pub gameweek: String,
    pub user_id: String,
}

/// A player to add, with the selection flags the user picked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SelectedPlayerRequest {
    pub id: PlayerId,
    #[serde(default)]
    pub is_substitute: bool,
    #[serde(default)]
    pub is_captain: bool,
}

/// Request body for mutating a roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterUpdateRequest {
    pub user_id: String,
    pub gameweek: String,
    #[serde(default)]
    pub add_players: Vec<SelectedPlayerRequest>,
    #[serde(default)]
    pub delete_players: Vec<PlayerId>,
}

/// Roster as returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    pub user_id: String,
    pub gameweek: String,
    pub players: Vec<RosterEntry>,
    pub total_value: i64,
    pub bank_money: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RosterResponse {
    pub fn from_state(user_id: &str, state: &UserGameweekState, message: Option<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            gameweek: state.gameweek.clone(),
            players: state.roster.values().cloned().collect(),
            total_value: state.total_value(),
            bank_money: state.bank_money,
            updated_at: state.updated_at.clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, price: i64, is_substitute: bool, is_captain: bool) -> RosterEntry {
        RosterEntry {
            id: id.to_string(),
            is_substitute,
            is_captain,
            name: format!("Player {}", id),
            position: Position::MF,
            price,
        }
    }

    #[test]
    fn test_state_json_round_trip() {
        let mut state = UserGameweekState::empty("12", 1000);
        for e in [
            entry("J1", 95, false, true),
            entry("J2", 71, true, false),
            entry("J3", 128, false, false),
        ] {
            state.bank_money -= e.price;
            state.roster.insert(e.id.clone(), e);
        }
        state.updated_at = Some("2026-10-18T09:00:00+00:00".to_string());

        let bytes = serde_json::to_vec(&state).unwrap();
        let decoded: UserGameweekState = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(decoded, state);
        assert_eq!(decoded.total_value() + decoded.bank_money, 1000);
    }

    #[test]
    fn test_state_without_timestamp_decodes() {
        let raw = r#"{"gameweek":"3","roster":{},"bank_money":500}"#;
        let state: UserGameweekState = serde_json::from_str(raw).unwrap();
        assert_eq!(state, UserGameweekState::empty("3", 500));
    }

    #[test]
    fn test_update_request_rejects_unknown_fields() {
        let raw = r#"{"user_id":"1","gameweek":"5","add_players":[],"extra":true}"#;
        assert!(serde_json::from_str::<RosterUpdateRequest>(raw).is_err());

        let raw = r#"{"user_id":"1","gameweek":"5","add_players":[{"id":"J1"}]}"#;
        let request: RosterUpdateRequest = serde_json::from_str(raw).unwrap();
        assert!(!request.add_players[0].is_captain);
        assert!(request.delete_players.is_empty());
    }
}
