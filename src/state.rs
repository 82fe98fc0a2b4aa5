use std::{sync::Arc, time::Duration};

use crate::cache::{init_redis, MemoryTreeCache, RedisTreeCache, TreeCache};
use crate::config::Config;
use crate::store::Store;

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub tree_cache: TreeCache,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();
        Self::with_config(config).await
    }

    pub async fn with_config(config: Config) -> Arc<Self> {
        let ttl = Duration::from_secs(config.tree_cache_ttl_secs);

        let tree_cache = match &config.redis_url {
            Some(redis_url) => {
                TreeCache::Redis(RedisTreeCache::new(init_redis(redis_url).await, ttl))
            }
            None => TreeCache::Memory(MemoryTreeCache::new(ttl)),
        };

        Arc::new(Self {
            config,
            store: Store::new(),
            tree_cache,
        })
    }
}
