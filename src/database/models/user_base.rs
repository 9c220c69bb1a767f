use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户基础记录，对应 user_base 表
///
/// 从仓库返回后是不可变快照，仓库不会原地修改已返回的实体。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserBaseEntity {
    pub id: i64,
    pub username: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl UserBaseEntity {
    pub fn sample(id: i64, username: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            phone: String::new(),
            email: format!("{}@example.com", username),
            password: String::new(),
            status: 0,
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

/// 创建用户的输入
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserBase {
    pub username: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// 用户基础记录的部分更新
///
/// `None` 的字段保持不变，只有给出的字段会被写入。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserBasePatch {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<i32>,
}

impl UserBasePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.status.is_none()
    }
}
