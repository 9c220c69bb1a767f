/// 用户基础记录缓存键前缀
const USER_BASE_PREFIX: &str = "UserBase";

/// 用户资料缓存键前缀
const USER_PROFILE_PREFIX: &str = "UserProfile";

/// 生成用户基础记录缓存键
pub fn user_base_key(id: i64) -> String {
    format!("{}:{}", USER_BASE_PREFIX, id)
}

/// 生成用户资料缓存键
pub fn user_profile_key(user_id: i64) -> String {
    format!("{}:{}", USER_PROFILE_PREFIX, user_id)
}
