// 测试替身
// 内存实现的缓存和数据库访问，带调用计数，供各模块的单元测试使用

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::store::CacheStore;
use crate::database::models::{
    NewUserBase, NewUserProfile, UserBaseEntity, UserBasePatch, UserProfileEntity,
    UserProfilePatch,
};
use crate::database::operations::{UserBaseStore, UserProfileStore};
use crate::error::AppError;

/// 内存键值缓存，忽略过期时间
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn multi_get(&self, keys: &[String]) -> Result<HashMap<String, String>, AppError> {
        let entries = self.entries.lock().unwrap();
        let mut found = HashMap::new();
        for key in keys {
            if let Some(value) = entries.get(key) {
                found.insert(key.clone(), value.clone());
            }
        }
        Ok(found)
    }

    async fn multi_set(
        &self,
        new_entries: &[(String, String)],
        _ttl: Duration,
    ) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap();
        for (key, value) in new_entries {
            entries.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// 每个操作都失败的缓存，模拟缓存服务不可用
pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        Err(AppError::CacheBackend("cache is down".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), AppError> {
        Err(AppError::CacheBackend("cache is down".to_string()))
    }

    async fn multi_get(&self, _keys: &[String]) -> Result<HashMap<String, String>, AppError> {
        Err(AppError::CacheBackend("cache is down".to_string()))
    }

    async fn multi_set(
        &self,
        _entries: &[(String, String)],
        _ttl: Duration,
    ) -> Result<(), AppError> {
        Err(AppError::CacheBackend("cache is down".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), AppError> {
        Err(AppError::CacheBackend("cache is down".to_string()))
    }
}

/// 内存用户基础记录存储，按查询类型分别计数
pub struct MemoryUserBaseStore {
    rows: Mutex<HashMap<i64, UserBaseEntity>>,
    point_fetches: AtomicUsize,
    batch_fetches: AtomicUsize,
    unique_fetches: AtomicUsize,
    updates: AtomicUsize,
    fetch_delay: Mutex<Duration>,
}

impl MemoryUserBaseStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            point_fetches: AtomicUsize::new(0),
            batch_fetches: AtomicUsize::new(0),
            unique_fetches: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            fetch_delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn insert(&self, row: UserBaseEntity) {
        self.rows.lock().unwrap().insert(row.id, row);
    }

    /// 拉长回源耗时，让并发未命中真正重叠
    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    pub fn point_fetches(&self) -> usize {
        self.point_fetches.load(Ordering::SeqCst)
    }

    pub fn batch_fetches(&self) -> usize {
        self.batch_fetches.load(Ordering::SeqCst)
    }

    pub fn unique_fetches(&self) -> usize {
        self.unique_fetches.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        let delay = *self.fetch_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl UserBaseStore for MemoryUserBaseStore {
    async fn create(&self, data: &NewUserBase) -> Result<i64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().max().copied().unwrap_or(0) + 1;
        let mut row = UserBaseEntity::sample(id, &data.username);
        row.phone = data.phone.clone();
        row.email = data.email.clone();
        row.password = data.password.clone();
        rows.insert(id, row);
        Ok(id)
    }

    async fn update(&self, id: i64, patch: &UserBasePatch) -> Result<(), AppError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(&id) {
            if let Some(username) = &patch.username {
                row.username = username.clone();
            }
            if let Some(phone) = &patch.phone {
                row.phone = phone.clone();
            }
            if let Some(email) = &patch.email {
                row.email = email.clone();
            }
            if let Some(password) = &patch.password {
                row.password = password.clone();
            }
            if let Some(status) = patch.status {
                row.status = status;
            }
        }
        Ok(())
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserBaseEntity>, AppError> {
        self.delay().await;
        self.point_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn fetch_by_username(&self, username: &str) -> Result<Option<UserBaseEntity>, AppError> {
        self.unique_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|row| row.username == username)
            .cloned())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<UserBaseEntity>, AppError> {
        self.unique_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|row| row.email == email)
            .cloned())
    }

    async fn fetch_by_phone(&self, phone: &str) -> Result<Option<UserBaseEntity>, AppError> {
        self.unique_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|row| row.phone == phone)
            .cloned())
    }

    async fn fetch_batch(&self, ids: &[i64]) -> Result<Vec<UserBaseEntity>, AppError> {
        self.delay().await;
        self.batch_fetches.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }
}

/// 内存用户资料存储
pub struct MemoryUserProfileStore {
    rows: Mutex<HashMap<i64, UserProfileEntity>>,
    point_fetches: AtomicUsize,
    batch_fetches: AtomicUsize,
    updates: AtomicUsize,
}

impl MemoryUserProfileStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            point_fetches: AtomicUsize::new(0),
            batch_fetches: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, row: UserProfileEntity) {
        self.rows.lock().unwrap().insert(row.user_id, row);
    }

    pub fn point_fetches(&self) -> usize {
        self.point_fetches.load(Ordering::SeqCst)
    }

    pub fn batch_fetches(&self) -> usize {
        self.batch_fetches.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserProfileStore for MemoryUserProfileStore {
    async fn create(&self, data: &NewUserProfile) -> Result<i64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let mut row = UserProfileEntity::sample(data.user_id, &data.nickname);
        row.avatar = data.avatar.clone();
        row.gender = data.gender.clone();
        row.birthday = data.birthday.clone();
        row.bio = data.bio.clone();
        rows.insert(data.user_id, row);
        Ok(data.user_id)
    }

    async fn update(&self, user_id: i64, patch: &UserProfilePatch) -> Result<(), AppError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(&user_id) {
            if let Some(nickname) = &patch.nickname {
                row.nickname = nickname.clone();
            }
            if let Some(avatar) = &patch.avatar {
                row.avatar = avatar.clone();
            }
            if let Some(gender) = &patch.gender {
                row.gender = gender.clone();
            }
            if let Some(birthday) = &patch.birthday {
                row.birthday = birthday.clone();
            }
            if let Some(bio) = &patch.bio {
                row.bio = bio.clone();
            }
        }
        Ok(())
    }

    async fn fetch_by_user_id(&self, user_id: i64) -> Result<Option<UserProfileEntity>, AppError> {
        self.point_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn fetch_batch(&self, user_ids: &[i64]) -> Result<Vec<UserProfileEntity>, AppError> {
        self.batch_fetches.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter_map(|user_id| rows.get(user_id).cloned())
            .collect())
    }
}
