use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Session entries expire with the cookie after two weeks of inactivity.
const SESSION_TTL_SECS: u64 = 14 * 24 * 60 * 60;

/// Key-value storage scoped by session identity. The extension ingestion
/// bridge keeps its transient batch here, and the auth service publishes the
/// session's user binding through the same store. Injected via `AppState`
/// rather than accessed as ambient context.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session: &str, field: &str) -> Result<Option<String>>;
    async fn put(&self, session: &str, field: &str, value: &str) -> Result<()>;
}

pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn key(session: &str, field: &str) -> String {
        format!("session:{session}:{field}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(Self::key(session, field)).await?;
        Ok(value)
    }

    async fn put(&self, session: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set_ex(Self::key(session, field), value, SESSION_TTL_SECS)
            .await?;
        Ok(())
    }
}

/// In-memory store for tests. Last write wins, like the Redis store.
#[cfg(test)]
pub struct MemorySessionStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session: &str, field: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(&RedisSessionStore::key(session, field)).cloned())
    }

    async fn put(&self, session: &str, field: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(RedisSessionStore::key(session, field), value.to_string());
        Ok(())
    }
}
