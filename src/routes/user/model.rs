use serde::{Deserialize, Serialize};

use crate::database::models::{UserBaseEntity, UserBasePatch, UserProfilePatch};

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneQuery {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct BatchGetUsersRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: i64,
    #[serde(flatten)]
    pub patch: UserBasePatch,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub user_id: i64,
    #[serde(flatten)]
    pub patch: UserProfilePatch,
}

/// 基础记录的对外表示，不带密码字段
#[derive(Debug, Serialize)]
pub struct BaseUserResponse {
    pub id: i64,
    pub username: String,
    pub phone: String,
    pub email: String,
    pub status: i32,
}

impl From<UserBaseEntity> for BaseUserResponse {
    fn from(user: UserBaseEntity) -> Self {
        Self {
            id: user.id,
            username: user.username,
            phone: user.phone,
            email: user.email,
            status: user.status,
        }
    }
}
