use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户资料，对应 user_profile 表，按 user_id 查找
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfileEntity {
    pub id: i64,
    pub user_id: i64,
    pub nickname: String,
    pub avatar: String,
    pub gender: String,
    pub birthday: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl UserProfileEntity {
    pub fn sample(user_id: i64, nickname: &str) -> Self {
        Self {
            id: user_id,
            user_id,
            nickname: nickname.to_string(),
            avatar: String::new(),
            gender: String::new(),
            birthday: String::new(),
            bio: String::new(),
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

/// 创建用户资料的输入
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserProfile {
    pub user_id: i64,
    pub nickname: String,
    pub avatar: String,
    pub gender: String,
    pub birthday: String,
    pub bio: String,
}

/// 用户资料的部分更新
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfilePatch {
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub bio: Option<String>,
}

impl UserProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.avatar.is_none()
            && self.gender.is_none()
            && self.birthday.is_none()
            && self.bio.is_none()
    }
}
