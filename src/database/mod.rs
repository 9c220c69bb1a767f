// 数据库模块
// 包含实体定义和数据库访问操作

pub mod models; // 实体定义
pub mod operations; // 数据库访问实现

// 重新导出常用类型，方便其他模块使用
pub use models::{UserBaseEntity, UserProfileEntity};
pub use operations::{PgUserBaseStore, PgUserProfileStore, UserBaseStore, UserProfileStore};
