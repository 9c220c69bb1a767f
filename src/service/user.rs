use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{
    NewUserBase, NewUserProfile, UserBaseEntity, UserBasePatch, UserProfileEntity,
    UserProfilePatch,
};
use crate::error::AppError;
use crate::repository::{UserBaseRepository, UserProfileRepository};

/// 聚合用户视图：基础记录加资料
///
/// 没有资料行的用户以空资料字段返回，不算错误。
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub phone: String,
    pub email: String,
    pub status: i32,
    pub nickname: String,
    pub avatar: String,
    pub gender: String,
    pub birthday: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

fn merge_user(base: UserBaseEntity, profile: Option<UserProfileEntity>) -> User {
    let profile = profile.unwrap_or_else(|| UserProfileEntity {
        id: 0,
        user_id: base.id,
        nickname: String::new(),
        avatar: String::new(),
        gender: String::new(),
        birthday: String::new(),
        bio: String::new(),
        created_at: base.created_at,
        updated_at: base.updated_at,
    });

    User {
        id: base.id,
        username: base.username,
        phone: base.phone,
        email: base.email,
        status: base.status,
        nickname: profile.nickname,
        avatar: profile.avatar,
        gender: profile.gender,
        birthday: profile.birthday,
        bio: profile.bio,
        created_at: base.created_at,
    }
}

/// 用户服务，持有两个仓库
pub struct UserService {
    base_repo: Arc<UserBaseRepository>,
    profile_repo: Arc<UserProfileRepository>,
}

impl UserService {
    pub fn new(
        base_repo: Arc<UserBaseRepository>,
        profile_repo: Arc<UserProfileRepository>,
    ) -> Self {
        Self {
            base_repo,
            profile_repo,
        }
    }

    /// 读取聚合视图
    ///
    /// 基础记录的错误原样上抛；资料缺失降级为空资料。
    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        let (base, profile) = tokio::join!(self.base_repo.get(id), self.profile_repo.get(id));
        let base = base?;
        let profile = match profile {
            Ok(profile) => Some(profile),
            Err(AppError::NotFound) => None,
            Err(err) => return Err(err),
        };
        Ok(merge_user(base, profile))
    }

    /// 批量读取聚合视图，顺序跟随基础记录的批量结果
    pub async fn batch_get_users(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        let (bases, profiles) = tokio::join!(
            self.base_repo.batch_get(ids),
            self.profile_repo.batch_get(ids)
        );
        let bases = bases?;
        let mut profile_map: HashMap<i64, UserProfileEntity> = profiles?
            .into_iter()
            .map(|profile| (profile.user_id, profile))
            .collect();

        Ok(bases
            .into_iter()
            .map(|base| {
                let profile = profile_map.remove(&base.id);
                merge_user(base, profile)
            })
            .collect())
    }

    pub async fn create_user(&self, data: &NewUserBase) -> Result<i64, AppError> {
        self.base_repo.create(data).await
    }

    pub async fn create_profile(&self, data: &NewUserProfile) -> Result<i64, AppError> {
        self.profile_repo.create(data).await
    }

    pub async fn update_user(&self, id: i64, patch: &UserBasePatch) -> Result<(), AppError> {
        self.base_repo.update(id, patch).await
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        patch: &UserProfilePatch,
    ) -> Result<(), AppError> {
        self.profile_repo.update(user_id, patch).await
    }

    /// 唯一字段查找，绕过缓存直达数据库
    pub async fn get_user_by_username(&self, username: &str) -> Result<UserBaseEntity, AppError> {
        self.base_repo.get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<UserBaseEntity, AppError> {
        self.base_repo.get_by_email(email).await
    }

    pub async fn get_user_by_phone(&self, phone: &str) -> Result<UserBaseEntity, AppError> {
        self.base_repo.get_by_phone(phone).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::operations::user_base::new_user_base_cache;
    use crate::cache::operations::user_profile::new_user_profile_cache;
    use crate::testing::{MemoryCacheStore, MemoryUserBaseStore, MemoryUserProfileStore};
    use std::time::Duration;

    fn service(
        base_store: Arc<MemoryUserBaseStore>,
        profile_store: Arc<MemoryUserProfileStore>,
    ) -> UserService {
        let cache_store = Arc::new(MemoryCacheStore::new());
        let base_repo = Arc::new(UserBaseRepository::new(
            base_store,
            new_user_base_cache(
                cache_store.clone(),
                Duration::from_secs(300),
                Duration::from_secs(60),
            ),
        ));
        let profile_repo = Arc::new(UserProfileRepository::new(
            profile_store,
            new_user_profile_cache(
                cache_store,
                Duration::from_secs(300),
                Duration::from_secs(60),
            ),
        ));
        UserService::new(base_repo, profile_repo)
    }

    #[tokio::test]
    async fn get_user_merges_base_and_profile() {
        let base_store = Arc::new(MemoryUserBaseStore::new());
        base_store.insert(UserBaseEntity::sample(1, "alice"));
        let profile_store = Arc::new(MemoryUserProfileStore::new());
        profile_store.insert(UserProfileEntity::sample(1, "Alice"));

        let svc = service(base_store, profile_store);
        let user = svc.get_user(1).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.nickname, "Alice");
    }

    #[tokio::test]
    async fn missing_profile_degrades_to_empty_fields() {
        let base_store = Arc::new(MemoryUserBaseStore::new());
        base_store.insert(UserBaseEntity::sample(1, "alice"));
        let profile_store = Arc::new(MemoryUserProfileStore::new());

        let svc = service(base_store, profile_store);
        let user = svc.get_user(1).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.nickname, "");
    }

    #[tokio::test]
    async fn missing_base_record_is_an_error() {
        let base_store = Arc::new(MemoryUserBaseStore::new());
        let profile_store = Arc::new(MemoryUserProfileStore::new());
        profile_store.insert(UserProfileEntity::sample(1, "Alice"));

        let svc = service(base_store, profile_store);
        assert!(matches!(svc.get_user(1).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn batch_get_users_aligns_profiles_by_user_id() {
        let base_store = Arc::new(MemoryUserBaseStore::new());
        base_store.insert(UserBaseEntity::sample(1, "alice"));
        base_store.insert(UserBaseEntity::sample(2, "bob"));
        let profile_store = Arc::new(MemoryUserProfileStore::new());
        // 只有 2 号有资料行
        profile_store.insert(UserProfileEntity::sample(2, "Bob"));

        let svc = service(base_store, profile_store);
        let users = svc.batch_get_users(&[1, 2, 3]).await.unwrap();
        assert_eq!(users.len(), 2);

        for user in users {
            match user.id {
                1 => assert_eq!(user.nickname, ""),
                2 => assert_eq!(user.nickname, "Bob"),
                other => panic!("unexpected user {}", other),
            }
        }
    }
}
