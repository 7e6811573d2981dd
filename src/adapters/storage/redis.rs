//! Redis-backed session store for multi-instance deployments.
//!
//! Sessions are stored as JSON under `trip_planner:session:<id>`. The
//! compare-and-set save runs as a Lua script so the revision check and the
//! write are atomic. An optional TTL expires idle sessions.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};

use crate::domain::foundation::SessionId;
use crate::domain::trip::TripSession;
use crate::ports::{SessionStore, SessionStoreError};

const KEY_PREFIX: &str = "trip_planner:session:";

/// KEYS[1] = session key, ARGV[1] = expected revision, ARGV[2] = payload,
/// ARGV[3] = ttl seconds (0 for none). Returns {accepted, stored_revision}.
static SAVE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
local current = redis.call('GET', KEYS[1])
local stored = 0
if current then
  stored = tonumber(cjson.decode(current)['revision']) or 0
end
if stored ~= tonumber(ARGV[1]) then
  return {0, stored}
end
local ttl = tonumber(ARGV[3])
if ttl > 0 then
  redis.call('SET', KEYS[1], ARGV[2], 'EX', ttl)
else
  redis.call('SET', KEYS[1], ARGV[2])
end
return {1, stored + 1}
"#,
    )
});

fn key(id: &SessionId) -> String {
    format!("{}{}", KEY_PREFIX, id)
}

fn backend(err: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Backend(err.to_string())
}

/// Redis session store.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: Option<u64>,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            ttl_secs: None,
        }
    }

    /// Connects to `url` and returns a store.
    pub async fn connect(url: &str) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url).map_err(backend)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(backend)?;
        Ok(Self::new(conn))
    }

    /// Expire sessions `ttl_secs` after their last save.
    pub fn with_ttl(mut self, ttl_secs: Option<u64>) -> Self {
        self.ttl_secs = ttl_secs.filter(|ttl| *ttl > 0);
        self
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<TripSession>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(key(id)).await.map_err(backend)?;
        payload
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))
            })
            .transpose()
    }

    async fn save(&self, session: &mut TripSession) -> Result<(), SessionStoreError> {
        let expected = session.revision();
        let mut next = session.clone();
        next.mark_saved(expected + 1);
        let payload = serde_json::to_string(&next)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        let mut conn = self.conn.clone();
        let (accepted, stored): (i64, i64) = SAVE_SCRIPT
            .key(key(session.id()))
            .arg(expected)
            .arg(payload)
            .arg(self.ttl_secs.unwrap_or(0))
            .invoke_async(&mut conn)
            .await
            .map_err(backend)?;

        if accepted == 1 {
            session.mark_saved(stored as u64);
            Ok(())
        } else {
            Err(SessionStoreError::RevisionConflict {
                session_id: session.id().clone(),
                expected,
                actual: stored as u64,
            })
        }
    }
}
