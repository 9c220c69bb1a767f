use std::sync::Arc;
use std::time::Duration;

use crate::cache::keys::user_keys;
use crate::cache::operations::EntityCache;
use crate::cache::store::CacheStore;
use crate::database::models::UserProfileEntity;

/// 用户资料缓存，键为所属用户 id
pub type UserProfileCache = EntityCache<UserProfileEntity>;

pub fn new_user_profile_cache(
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    not_found_ttl: Duration,
) -> UserProfileCache {
    EntityCache::new(store, user_keys::user_profile_key, ttl, not_found_ttl)
}
