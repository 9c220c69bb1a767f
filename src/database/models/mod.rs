// 数据库实体定义

pub mod user_base;
pub mod user_profile;

pub use user_base::{NewUserBase, UserBaseEntity, UserBasePatch};
pub use user_profile::{NewUserProfile, UserProfileEntity, UserProfilePatch};
