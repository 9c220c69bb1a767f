use std::sync::Arc;

use crate::cache::operations::{CacheLookup, UserProfileCache};
use crate::database::models::{NewUserProfile, UserProfileEntity, UserProfilePatch};
use crate::database::operations::UserProfileStore;
use crate::error::AppError;
use crate::repository::singleflight::SingleFlight;

/// 用户资料仓库，与 [`super::UserBaseRepository`] 相同的读写模式，
/// 维度是所属用户 id
pub struct UserProfileRepository {
    store: Arc<dyn UserProfileStore>,
    cache: UserProfileCache,
    flight: SingleFlight<Option<UserProfileEntity>>,
}

impl UserProfileRepository {
    pub fn new(store: Arc<dyn UserProfileStore>, cache: UserProfileCache) -> Self {
        Self {
            store,
            cache,
            flight: SingleFlight::new(),
        }
    }

    /// 按用户 id 读取资料
    pub async fn get(&self, user_id: i64) -> Result<UserProfileEntity, AppError> {
        match self.cache.get(user_id).await? {
            CacheLookup::Hit(profile) => return Ok(profile),
            CacheLookup::NotFoundCached => return Err(AppError::NotFound),
            CacheLookup::Miss => {}
        }

        let store = Arc::clone(&self.store);
        let cache = self.cache.clone();
        let fetched = self
            .flight
            .run(&format!("get_user_profile_{}", user_id), async move {
                match store.fetch_by_user_id(user_id).await? {
                    Some(profile) if profile.user_id > 0 => {
                        cache.set(profile.user_id, &profile).await?;
                        Ok(Some(profile))
                    }
                    _ => {
                        cache.set_not_found(user_id).await?;
                        Ok(None)
                    }
                }
            })
            .await?;

        fetched.ok_or(AppError::NotFound)
    }

    /// 批量读取资料，结果里缺失的用户没有资料行
    pub async fn batch_get(&self, user_ids: &[i64]) -> Result<Vec<UserProfileEntity>, AppError> {
        let mut cached = self.cache.multi_get(user_ids).await?;

        let mut profiles = Vec::with_capacity(user_ids.len());
        let mut missed_ids = Vec::new();
        for user_id in user_ids {
            match cached.remove(&user_id.to_string()) {
                Some(profile) => profiles.push(profile),
                None => missed_ids.push(*user_id),
            }
        }

        if !missed_ids.is_empty() {
            let missed = self.store.fetch_batch(&missed_ids).await?;
            if !missed.is_empty() {
                let entries: Vec<(i64, &UserProfileEntity)> = missed
                    .iter()
                    .map(|profile| (profile.user_id, profile))
                    .collect();
                self.cache.multi_set(&entries).await?;
                profiles.extend(missed);
            }
        }

        Ok(profiles)
    }

    /// 创建资料，不触碰缓存
    pub async fn create(&self, data: &NewUserProfile) -> Result<i64, AppError> {
        if data.user_id == 0 {
            return Err(AppError::InvalidState("user_id is zero".to_string()));
        }
        self.store.create(data).await
    }

    /// 部分更新，随后删除缓存条目
    pub async fn update(&self, user_id: i64, patch: &UserProfilePatch) -> Result<(), AppError> {
        if user_id == 0 {
            return Err(AppError::InvalidState("user_id is zero".to_string()));
        }

        self.get(user_id).await?;

        self.store.update(user_id, patch).await?;

        if let Err(err) = self.cache.delete(user_id).await {
            tracing::warn!("failed to drop cache for user profile {}: {}", user_id, err);
        }

        Ok(())
    }
}
