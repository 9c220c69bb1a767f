/// 数据库访问操作
/// 只负责按 id / 唯一字段 / 批量查询系统记录，不做缓存也不做重试

pub mod user_base;
pub mod user_profile;

pub use user_base::{PgUserBaseStore, UserBaseStore};
pub use user_profile::{PgUserProfileStore, UserProfileStore};
