//! Score API endpoints.

use axum::extract::State;

use super::{success, ApiQuery, ApiResult};
use crate::engine::compute_score;
use crate::errors::AppError;
use crate::models::{ScoreQuery, ScoreResponse, ScoreResult};
use crate::AppState;

/// GET /api/score?players=ID,ID - Current gameweek score for the given players.
pub async fn get_score(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ScoreQuery>,
) -> ApiResult<ScoreResponse> {
    let player_ids = query.player_ids();
    if player_ids.is_empty() {
        return Err(AppError::Validation(
            "At least one player id is required".to_string(),
        ));
    }

    let snapshot = state.feed.fetch().await?;
    let result = compute_score(&snapshot, &player_ids)?;

    if let ScoreResult::Unavailable { player_name } = &result {
        tracing::info!(
            "Score for gameweek {} not yet published for {}",
            snapshot.gameweek,
            player_name
        );
    }

    success(result.into())
}
