//! Redis-backed state store.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::StateStore;
use crate::errors::AppError;

/// Plain `GET`/`SET` against a Redis server. Keys never expire.
#[derive(Clone)]
pub struct RedisStateStore {
    connection_manager: ConnectionManager,
}

impl RedisStateStore {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)?;
        let connection_manager = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis state store");
        Ok(Self { connection_manager })
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let mut conn = self.connection_manager.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        let mut conn = self.connection_manager.clone();
        conn.set::<_, _, ()>(key, value).await?;
        tracing::debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
