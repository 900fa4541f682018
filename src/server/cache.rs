// src/server/cache.rs

//! Read-through cache for per-owner game lists.
//!
//! Entries are the serialized list body, keyed by owner. They expire after
//! `GAME_LIST_TTL_SECS` and are dropped on every create, update or delete
//! by that owner, so a write is always visible on the next list request.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::config::cache::{GAME_LIST_MAX_OWNERS, GAME_LIST_TTL_SECS};
use crate::game::types::OwnerId;

#[derive(Debug, Clone)]
pub struct GameListCache {
    inner: Cache<OwnerId, Arc<str>>,
}

impl GameListCache {
    pub fn new() -> Self {
        Self::with_ttl(GAME_LIST_MAX_OWNERS, Duration::from_secs(GAME_LIST_TTL_SECS))
    }

    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, owner: &OwnerId) -> Option<Arc<str>> {
        self.inner.get(owner).await
    }

    pub async fn insert(&self, owner: OwnerId, body: Arc<str>) {
        self.inner.insert(owner, body).await;
    }

    pub async fn invalidate(&self, owner: &OwnerId) {
        self.inner.invalidate(owner).await;
    }
}

impl Default for GameListCache {
    fn default() -> Self {
        Self::new()
    }
}
