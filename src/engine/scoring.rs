//! Gameweek score totals.

use crate::errors::AppError;
use crate::models::{FeedSnapshot, PlayerId, ScoreResult};

/// Sum the current-week scores of `player_ids`, in request order.
///
/// The first player without a published score short-circuits to
/// [`ScoreResult::Unavailable`]; no partial total is produced. An id missing from the snapshot
/// is an `UnknownPlayer` error.
pub fn compute_score(
    snapshot: &FeedSnapshot,
    player_ids: &[PlayerId],
) -> Result<ScoreResult, AppError> {
    let mut players_score = Vec::with_capacity(player_ids.len());

    for id in player_ids {
        let player = snapshot
            .get(id)
            .ok_or_else(|| AppError::UnknownPlayer(id.clone()))?;

        match player.current_score {
            Some(score) => players_score.push((player.name.clone(), score)),
            None => {
                return Ok(ScoreResult::Unavailable {
                    player_name: player.name.clone(),
                })
            }
        }
    }

    let total_scores = players_score.iter().map(|(_, score)| score).sum();

    Ok(ScoreResult::Scored {
        players_score,
        total_scores,
        gameweek: snapshot.gameweek.clone(),
    })
}
