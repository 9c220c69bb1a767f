// 缓存模块
// 键值缓存抽象、Redis 实现以及按实体类型的缓存操作

pub mod keys;
pub mod operations;
pub mod redis_store;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use operations::{CacheLookup, EntityCache};
pub use redis_store::RedisCacheStore;
pub use store::{CacheStore, NOT_FOUND_PLACEHOLDER};
