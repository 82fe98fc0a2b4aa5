//! Tree cache.
//!
//! Time-bounded memoization of the built category tree under a fixed key.
//! Two backends: an in-process TTL cache (default, and what tests use) and
//! Redis for deployments where several instances should share the entry.
//! Mutating category handlers invalidate the key synchronously, so the TTL
//! is a backstop rather than the only freshness bound.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};
use tracing::info;

use crate::error::AppError;
use crate::tree::CategoryNode;

pub const TREE_CACHE_KEY: &str = "category_tree";

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    info!("Connected to Redis at {redis_url}");
    connection_manager
}

pub enum TreeCache {
    Memory(MemoryTreeCache),
    Redis(RedisTreeCache),
}

impl TreeCache {
    pub async fn get(&self) -> Result<Option<Vec<CategoryNode>>, AppError> {
        match self {
            TreeCache::Memory(cache) => Ok(cache.get()),
            TreeCache::Redis(cache) => cache.get().await,
        }
    }

    pub async fn set(&self, tree: &[CategoryNode]) -> Result<(), AppError> {
        match self {
            TreeCache::Memory(cache) => {
                cache.set(tree);
                Ok(())
            }
            TreeCache::Redis(cache) => cache.set(tree).await,
        }
    }

    pub async fn invalidate(&self) -> Result<(), AppError> {
        match self {
            TreeCache::Memory(cache) => {
                cache.invalidate();
                Ok(())
            }
            TreeCache::Redis(cache) => cache.invalidate().await,
        }
    }
}

pub struct MemoryTreeCache {
    ttl: Duration,
    entry: Mutex<Option<(Instant, Vec<CategoryNode>)>>,
}

impl MemoryTreeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn get(&self) -> Option<Vec<CategoryNode>> {
        let mut entry = self.entry.lock();
        match entry.as_ref() {
            Some((stored_at, tree)) if stored_at.elapsed() < self.ttl => Some(tree.clone()),
            Some(_) => {
                *entry = None;
                None
            }
            None => None,
        }
    }

    pub fn set(&self, tree: &[CategoryNode]) {
        *self.entry.lock() = Some((Instant::now(), tree.to_vec()));
    }

    pub fn invalidate(&self) {
        *self.entry.lock() = None;
    }
}

pub struct RedisTreeCache {
    connection: ConnectionManager,
    ttl_secs: u64,
}

impl RedisTreeCache {
    pub fn new(connection: ConnectionManager, ttl: Duration) -> Self {
        Self {
            connection,
            ttl_secs: ttl.as_secs().max(1),
        }
    }

    pub async fn get(&self) -> Result<Option<Vec<CategoryNode>>, AppError> {
        let mut connection = self.connection.clone();
        let payload: Option<String> = connection.get(TREE_CACHE_KEY).await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, tree: &[CategoryNode]) -> Result<(), AppError> {
        let mut connection = self.connection.clone();
        let json = serde_json::to_string(tree)?;
        let _: () = connection.set_ex(TREE_CACHE_KEY, json, self.ttl_secs).await?;
        Ok(())
    }

    pub async fn invalidate(&self) -> Result<(), AppError> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(TREE_CACHE_KEY).await?;
        Ok(())
    }
}
