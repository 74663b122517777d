//! Score query models.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Query parameters for a score lookup: `?players=ID,ID,...`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreQuery {
    #[serde(default)]
    pub players: Option<String>,
}

impl ScoreQuery {
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Outcome of scoring a set of players against one feed snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreResult {
    Scored {
        players_score: Vec<(String, i64)>,
        total_scores: i64,
        gameweek: String,
    },
    /// Named player has no published score yet.
    Unavailable { player_name: String },
}

/// Score lookup as returned to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub players_score: Vec<(String, i64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_scores: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gameweek: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ScoreResult> for ScoreResponse {
    fn from(result: ScoreResult) -> Self {
        match result {
            ScoreResult::Scored {
                players_score,
                total_scores,
                gameweek,
            } => Self {
                players_score,
                total_scores: Some(total_scores),
                gameweek: Some(gameweek),
                message: None,
            },
            ScoreResult::Unavailable { player_name } => Self {
                message: Some(format!("Score for {} is not available yet", player_name)),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ids_split() {
        let query = ScoreQuery {
            players: Some("J1, J2,,J3".to_string()),
        };
        assert_eq!(query.player_ids(), vec!["J1", "J2", "J3"]);
        assert!(ScoreQuery { players: None }.player_ids().is_empty());
    }

    #[test]
    fn test_unavailable_response_has_no_total() {
        let response: ScoreResponse = ScoreResult::Unavailable {
            player_name: "Tanaka".to_string(),
        }
        .into();
        assert!(response.total_scores.is_none());
        assert!(response.players_score.is_empty());
        assert!(response.message.unwrap().contains("Tanaka"));
    }
}
