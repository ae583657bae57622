use redis::{AsyncCommands, RedisResult};

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Fixed-window counter. `true` while `key` has been hit at most `limit` times in the window.
    /// The window opens on the first hit and is not extended by later ones.
    pub async fn check_rate_limit(&self, key: &str, limit: i64, window_seconds: i64) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let count: i64 = conn.incr(key, 1).await?;
        if count == 1 {
            let _: () = conn.expire(key, window_seconds).await?;
        }

        Ok(count <= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    #[ignore = "needs a Redis server at REDIS_URL"]
    async fn test_window_is_not_extended_by_later_hits() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let redis = RedisClient::new(&url).unwrap();
        let key = format!("rate_limit:test:{}", uuid::Uuid::new_v4());

        assert!(redis.check_rate_limit(&key, 2, 1).await.unwrap());
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(redis.check_rate_limit(&key, 2, 1).await.unwrap());
        assert!(!redis.check_rate_limit(&key, 2, 1).await.unwrap());

        // Past the first hit's window: the counter starts over.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(redis.check_rate_limit(&key, 2, 1).await.unwrap());
    }
}
