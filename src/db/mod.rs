//! State store for per-user gameweek rosters.
//!
//! The service only needs `get`/`set` on opaque bytes keyed by `"{gameweek}:{user_id}"`.
//! SQLite and Redis backends are provided; [`open_store`] picks one from the configured URL.

mod redis_store;
mod sqlite_store;

pub use redis_store::RedisStateStore;
pub use sqlite_store::{init_database, SqliteStateStore};

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::UserGameweekState;

/// Key-value persistence for serialized user state.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

/// Store key for one user's roster in one gameweek.
pub fn state_key(gameweek: &str, user_id: &str) -> String {
    format!("{}:{}", gameweek, user_id)
}

/// Load and decode the stored state, `None` when nothing has been saved yet.
pub async fn load_state(
    store: &dyn StateStore,
    gameweek: &str,
    user_id: &str,
) -> Result<Option<UserGameweekState>, AppError> {
    let key = state_key(gameweek, user_id);
    match store.get(&key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Encode and write back a user's state.
pub async fn save_state(
    store: &dyn StateStore,
    user_id: &str,
    state: &UserGameweekState,
) -> Result<(), AppError> {
    let key = state_key(&state.gameweek, user_id);
    let bytes = serde_json::to_vec(state)
        .map_err(|e| AppError::Internal(format!("Failed to encode state: {}", e)))?;
    store.set(&key, &bytes).await
}

/// Open the backend named by `url`: `redis://` / `rediss://` or a SQLite path
/// (optionally prefixed with `sqlite:`).
pub async fn open_store(url: &str) -> Result<Arc<dyn StateStore>, AppError> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        let store = RedisStateStore::connect(url).await?;
        return Ok(Arc::new(store));
    }

    let path = url.strip_prefix("sqlite:").unwrap_or(url);
    let pool = init_database(Path::new(path)).await?;
    Ok(Arc::new(SqliteStateStore::new(pool)))
}
