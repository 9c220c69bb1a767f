// 缓存操作
// 提供按实体类型的类型化缓存读写

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::store::{CacheStore, NOT_FOUND_PLACEHOLDER};
use crate::error::AppError;

// 用户基础记录缓存
pub mod user_base;

// 用户资料缓存
pub mod user_profile;

pub use user_base::UserBaseCache;
pub use user_profile::UserProfileCache;

/// 单次缓存读取的三种结果
///
/// 一个键在任一时刻只处于 {缺失, 占位符, 实体} 之一：
/// `Miss` 表示未知，必须回源；`NotFoundCached` 表示数据库已确认不存在。
#[derive(Debug)]
pub enum CacheLookup<T> {
    Hit(T),
    NotFoundCached,
    Miss,
}

/// 某一实体类型的类型化缓存
///
/// 包装注入的 [`CacheStore`]，负责键的生成和 JSON 编解码。
/// 每种实体通过自己的键函数和 TTL 实例化，见 `user_base` / `user_profile`。
pub struct EntityCache<T> {
    store: Arc<dyn CacheStore>,
    key_fn: fn(i64) -> String,
    ttl: Duration,
    not_found_ttl: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityCache<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key_fn: self.key_fn,
            ttl: self.ttl,
            not_found_ttl: self.not_found_ttl,
            _entity: PhantomData,
        }
    }
}

impl<T> EntityCache<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(
        store: Arc<dyn CacheStore>,
        key_fn: fn(i64) -> String,
        ttl: Duration,
        not_found_ttl: Duration,
    ) -> Self {
        Self {
            store,
            key_fn,
            ttl,
            not_found_ttl,
            _entity: PhantomData,
        }
    }

    pub fn key(&self, id: i64) -> String {
        (self.key_fn)(id)
    }

    /// 读取单个实体
    pub async fn get(&self, id: i64) -> Result<CacheLookup<T>, AppError> {
        match self.store.get(&self.key(id)).await? {
            None => Ok(CacheLookup::Miss),
            Some(raw) if raw == NOT_FOUND_PLACEHOLDER => Ok(CacheLookup::NotFoundCached),
            Some(raw) => Ok(CacheLookup::Hit(serde_json::from_str(&raw)?)),
        }
    }

    /// 写入单个实体，零值 id 直接跳过
    pub async fn set(&self, id: i64, data: &T) -> Result<(), AppError> {
        if id == 0 {
            return Ok(());
        }
        let raw = serde_json::to_string(data)?;
        self.store.set(&self.key(id), &raw, self.ttl).await
    }

    /// 批量读取，返回以十进制 id 字符串为键的 map
    ///
    /// 缺失的键不出现在结果里；占位符同样被跳过，批量路径不区分
    /// "未缓存"和"缓存了不存在"，两者都交给调用方按未命中处理。
    pub async fn multi_get(&self, ids: &[i64]) -> Result<HashMap<String, T>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| self.key(*id)).collect();
        let found = self.store.multi_get(&keys).await?;

        let mut items = HashMap::new();
        for id in ids {
            if let Some(raw) = found.get(&self.key(*id)) {
                if raw == NOT_FOUND_PLACEHOLDER {
                    continue;
                }
                items.insert(id.to_string(), serde_json::from_str(raw)?);
            }
        }
        Ok(items)
    }

    /// 批量写入，零值 id 跳过
    pub async fn multi_set(&self, entries: &[(i64, &T)]) -> Result<(), AppError> {
        let mut raw_entries = Vec::with_capacity(entries.len());
        for (id, data) in entries {
            if *id == 0 {
                continue;
            }
            raw_entries.push((self.key(*id), serde_json::to_string(data)?));
        }
        if raw_entries.is_empty() {
            return Ok(());
        }
        self.store.multi_set(&raw_entries, self.ttl).await
    }

    /// 删除缓存条目
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.store.delete(&self.key(id)).await
    }

    /// 写入未命中占位符
    pub async fn set_not_found(&self, id: i64) -> Result<(), AppError> {
        self.store
            .set(&self.key(id), NOT_FOUND_PLACEHOLDER, self.not_found_ttl)
            .await
    }
}
