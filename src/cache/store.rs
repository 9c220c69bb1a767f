use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppError;

/// 未命中占位符
///
/// 写入该值表示"数据库确认不存在"，与缓存键缺失（未知，需要回源）
/// 以及正常的 JSON 实体值（总是以 `{` 开头）都区分开。
pub const NOT_FOUND_PLACEHOLDER: &str = "*";

/// 键值缓存抽象
///
/// 值统一为字符串，序列化由上层的类型化缓存负责。所有失败都是
/// `AppError::CacheBackend`；批量读取对部分未命中不报错，缺失的键
/// 只是不出现在返回的 map 里。
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError>;

    async fn multi_get(&self, keys: &[String]) -> Result<HashMap<String, String>, AppError>;

    async fn multi_set(&self, entries: &[(String, String)], ttl: Duration)
    -> Result<(), AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}
