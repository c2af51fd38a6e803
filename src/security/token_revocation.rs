/// Token revocation (blacklist) store
///
/// Revoked token ids (`jti` claims) are recorded with a TTL covering the
/// token's remaining lifetime, then dropped to bound storage growth. Lookups
/// are fail-open on absence: an id is only ever revoked by explicit logout.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;

use crate::error::Result;

/// Floor TTL applied when a token is already expired at revocation time, so
/// a logout racing natural expiry still leaves a visible record briefly.
const MIN_REVOCATION_TTL_SECS: u64 = 300;

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `jti` as revoked for at least `ttl`. Revoking an id that is
    /// already revoked is a no-op success. After this returns, every
    /// subsequent `is_revoked` call must observe the revocation.
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<()>;

    /// O(1) lookup; false for unknown ids.
    async fn is_revoked(&self, jti: &str) -> Result<bool>;
}

/// Clamp a requested TTL to the minimum floor.
pub fn effective_ttl(ttl: Duration) -> Duration {
    ttl.max(Duration::from_secs(MIN_REVOCATION_TTL_SECS))
}

/// Redis-backed revocation store, one `SET ... EX` key per revoked id.
#[derive(Clone)]
pub struct RedisRevocationStore {
    redis: ConnectionManager,
}

impl RedisRevocationStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn key(jti: &str) -> String {
        format!("authd:revoked:jti:{}", jti)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<()> {
        let ttl = effective_ttl(ttl);
        let mut redis = self.redis.clone();
        redis::cmd("SET")
            .arg(Self::key(jti))
            .arg("1")
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async::<_, ()>(&mut redis)
            .await?;

        tracing::info!(
            "Token revoked, blacklist entry will expire in {} seconds",
            ttl.as_secs()
        );
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool> {
        let mut redis = self.redis.clone();
        let exists: bool = redis::cmd("EXISTS")
            .arg(Self::key(jti))
            .query_async(&mut redis)
            .await?;
        Ok(exists)
    }
}

/// In-process revocation store for tests and single-instance deployments.
///
/// Entries are per-key atomic upserts on a `DashMap`; expired entries are
/// evicted lazily on lookup and swept opportunistically on write. Guards are
/// never held across an await point.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    entries: DashMap<String, Instant>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<()> {
        let deadline = Instant::now() + effective_ttl(ttl);
        self.entries.insert(jti.to_string(), deadline);

        // Opportunistic sweep keeps the map bounded without a background task.
        let now = Instant::now();
        self.entries.retain(|_, expires| *expires > now);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool> {
        let now = Instant::now();
        // Copy the deadline out so the shard guard is released before any
        // mutation below.
        let live = match self.entries.get(jti) {
            Some(entry) => *entry > now,
            None => return Ok(false),
        };
        if !live {
            self.entries.remove_if(jti, |_, expires| *expires <= now);
        }
        Ok(live)
    }
}
