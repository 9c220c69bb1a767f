use std::sync::Arc;

use crate::cache::operations::{CacheLookup, UserBaseCache};
use crate::database::models::{NewUserBase, UserBaseEntity, UserBasePatch};
use crate::database::operations::UserBaseStore;
use crate::error::AppError;
use crate::repository::singleflight::SingleFlight;

/// 用户基础记录仓库
///
/// 读走 cache-aside，写直达数据库并删除对应缓存条目。
/// 缓存和数据库访问都由构造方注入，仓库自身不持有全局状态。
pub struct UserBaseRepository {
    store: Arc<dyn UserBaseStore>,
    cache: UserBaseCache,
    flight: SingleFlight<Option<UserBaseEntity>>,
}

impl UserBaseRepository {
    pub fn new(store: Arc<dyn UserBaseStore>, cache: UserBaseCache) -> Self {
        Self {
            store,
            cache,
            flight: SingleFlight::new(),
        }
    }

    /// 按 id 读取
    ///
    /// 缓存故障直接返回错误，不会退化成绕过缓存打数据库：
    /// 缓存降级时把全部读放到数据库上只会把故障放大。
    pub async fn get(&self, id: i64) -> Result<UserBaseEntity, AppError> {
        match self.cache.get(id).await? {
            CacheLookup::Hit(user) => return Ok(user),
            CacheLookup::NotFoundCached => return Err(AppError::NotFound),
            CacheLookup::Miss => {}
        }

        // 真未命中才合并回源，缓存读本身不合并：
        // 已缓存的 key 不该等别人的在途回源
        let store = Arc::clone(&self.store);
        let cache = self.cache.clone();
        let fetched = self
            .flight
            .run(&format!("get_user_base_{}", id), async move {
                match store.fetch_by_id(id).await? {
                    Some(user) if user.id > 0 => {
                        cache.set(user.id, &user).await?;
                        Ok(Some(user))
                    }
                    _ => {
                        // 写占位符，拦住对同一个不存在 id 的反复穿透
                        cache.set_not_found(id).await?;
                        Ok(None)
                    }
                }
            })
            .await?;

        fetched.ok_or(AppError::NotFound)
    }

    /// 批量读取
    ///
    /// 命中在前、补取在后；数据库里不存在的 id 不出现在结果里，
    /// 也不构成错误。只把新取到的行回写缓存。
    pub async fn batch_get(&self, ids: &[i64]) -> Result<Vec<UserBaseEntity>, AppError> {
        let mut cached = self.cache.multi_get(ids).await?;

        let mut users = Vec::with_capacity(ids.len());
        let mut missed_ids = Vec::new();
        for id in ids {
            match cached.remove(&id.to_string()) {
                Some(user) => users.push(user),
                None => missed_ids.push(*id),
            }
        }

        if !missed_ids.is_empty() {
            let missed = self.store.fetch_batch(&missed_ids).await?;
            if !missed.is_empty() {
                let entries: Vec<(i64, &UserBaseEntity)> =
                    missed.iter().map(|user| (user.id, user)).collect();
                self.cache.multi_set(&entries).await?;
                users.extend(missed);
            }
        }

        Ok(users)
    }

    /// 创建用户，不触碰缓存，由下一次读惰性填充
    pub async fn create(&self, data: &NewUserBase) -> Result<i64, AppError> {
        if data.username.is_empty() {
            return Err(AppError::InvalidState("username is empty".to_string()));
        }
        self.store.create(data).await
    }

    /// 部分更新，随后无条件删除缓存条目
    ///
    /// 删除失败只记日志不影响更新结果，过期时间兜底有界的脏读窗口。
    pub async fn update(&self, id: i64, patch: &UserBasePatch) -> Result<(), AppError> {
        if id == 0 {
            return Err(AppError::InvalidState("id is zero".to_string()));
        }

        // 确认行存在，不存在直接返回 NotFound
        self.get(id).await?;

        self.store.update(id, patch).await?;

        if let Err(err) = self.cache.delete(id).await {
            tracing::warn!("failed to drop cache for user base {}: {}", id, err);
        }

        Ok(())
    }

    /// 按用户名查找，不走缓存
    pub async fn get_by_username(&self, username: &str) -> Result<UserBaseEntity, AppError> {
        self.store
            .fetch_by_username(username)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// 按邮箱查找，不走缓存
    pub async fn get_by_email(&self, email: &str) -> Result<UserBaseEntity, AppError> {
        self.store
            .fetch_by_email(email)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// 按手机号查找，不走缓存
    pub async fn get_by_phone(&self, phone: &str) -> Result<UserBaseEntity, AppError> {
        self.store
            .fetch_by_phone(phone)
            .await?
            .ok_or(AppError::NotFound)
    }
}
