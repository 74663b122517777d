//! Roster API endpoints.

use axum::extract::State;
use chrono::Utc;

use super::{ensure_allowed_user, success, ApiJson, ApiQuery, ApiResult};
use crate::db::{load_state, save_state};
use crate::errors::AppError;
use crate::models::{RosterQuery, RosterResponse, RosterUpdateRequest, UserGameweekState};
use crate::AppState;

/// Normalizes numeric labels so `"05"` and `"5"` address the same stored roster.
fn canonical_gameweek(raw: &str) -> Option<String> {
    raw.trim().parse::<i64>().ok().map(|gw| gw.to_string())
}

/// A key is only written once it holds something: a request against an unsaved key that
/// leaves the roster empty (deletions only, or an unaffordable first addition) stores nothing.
fn should_persist(had_state: bool, next: &UserGameweekState) -> bool {
    had_state || !next.roster.is_empty()
}

/// GET /api/roster?gameweek=G&user_id=U - Stored roster, or an empty one with the full budget.
pub async fn get_roster(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RosterQuery>,
) -> ApiResult<RosterResponse> {
    ensure_allowed_user(&state.config, &query.user_id)?;

    let gameweek = canonical_gameweek(&query.gameweek).ok_or_else(|| {
        AppError::Validation(format!("Gameweek {:?} is not a number", query.gameweek))
    })?;

    let user_state = load_state(state.store.as_ref(), &gameweek, &query.user_id)
        .await?
        .unwrap_or_else(|| state.engine.initial_state(&gameweek));

    success(RosterResponse::from_state(&query.user_id, &user_state, None))
}

/// POST /api/roster - Apply deletions and additions, then persist the result.
///
/// A batch stopped by insufficient funds is still saved with every step applied before the
/// stop, unless that leaves a never-saved key empty. The response carries a message naming
/// the player that could not be afforded.
pub async fn update_roster(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RosterUpdateRequest>,
) -> ApiResult<RosterResponse> {
    ensure_allowed_user(&state.config, &request.user_id)?;

    let gameweek = canonical_gameweek(&request.gameweek).unwrap_or_else(|| request.gameweek.clone());
    let snapshot = state.feed.fetch().await?;
    let current = load_state(state.store.as_ref(), &gameweek, &request.user_id).await?;
    let had_state = current.is_some();

    let (mut user_state, outcome) = state.engine.apply(
        current,
        &snapshot,
        &gameweek,
        &request.delete_players,
        &request.add_players,
    )?;

    if should_persist(had_state, &user_state) {
        user_state.updated_at = Some(Utc::now().to_rfc3339());
        save_state(state.store.as_ref(), &request.user_id, &user_state).await?;
    } else {
        tracing::debug!(
            "Nothing to store for user {} gameweek {}",
            request.user_id,
            gameweek
        );
    }

    let message = outcome.message();
    match &message {
        Some(reason) => tracing::info!(
            "Roster for user {} gameweek {} partially applied: {}",
            request.user_id,
            gameweek,
            reason
        ),
        None => tracing::info!(
            "Roster for user {} gameweek {} updated: {} players, bank {}",
            request.user_id,
            gameweek,
            user_state.roster.len(),
            user_state.bank_money
        ),
    }

    success(RosterResponse::from_state(&request.user_id, &user_state, message))
}
