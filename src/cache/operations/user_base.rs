use std::sync::Arc;
use std::time::Duration;

use crate::cache::keys::user_keys;
use crate::cache::operations::EntityCache;
use crate::cache::store::CacheStore;
use crate::database::models::UserBaseEntity;

/// 用户基础记录缓存
pub type UserBaseCache = EntityCache<UserBaseEntity>;

pub fn new_user_base_cache(
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    not_found_ttl: Duration,
) -> UserBaseCache {
    EntityCache::new(store, user_keys::user_base_key, ttl, not_found_ttl)
}
