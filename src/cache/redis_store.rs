use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::store::CacheStore;
use crate::error::AppError;

/// 基于 Redis 的缓存实现
pub struct RedisCacheStore {
    client: Arc<RedisClient>,
}

impl RedisCacheStore {
    pub fn new(client: Arc<RedisClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn multi_get(&self, keys: &[String]) -> Result<HashMap<String, String>, AppError> {
        // MGET 不接受空键列表
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await?;

        let mut found = HashMap::new();
        for (key, value) in keys.iter().zip(values) {
            if let Some(value) = value {
                found.insert(key.clone(), value);
            }
        }
        Ok(found)
    }

    async fn multi_set(
        &self,
        entries: &[(String, String)],
        ttl: Duration,
    ) -> Result<(), AppError> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;

        // Redis 没有带过期时间的 MSET，用 pipeline 逐键 SET EX
        let mut pipe = redis::pipe();
        for (key, value) in entries {
            pipe.set_ex(key, value, ttl.as_secs()).ignore();
        }
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let _: () = conn.del(key).await?;
        Ok(())
    }
}
