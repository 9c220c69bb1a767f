use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::database::models::{NewUserProfile, UserProfileEntity, UserProfilePatch};
use crate::error::AppError;

/// 用户资料的数据库访问接口
#[async_trait]
pub trait UserProfileStore: Send + Sync {
    async fn create(&self, data: &NewUserProfile) -> Result<i64, AppError>;

    async fn update(&self, user_id: i64, patch: &UserProfilePatch) -> Result<(), AppError>;

    async fn fetch_by_user_id(&self, user_id: i64) -> Result<Option<UserProfileEntity>, AppError>;

    /// 批量查询，只返回存在的行，顺序不保证
    async fn fetch_batch(&self, user_ids: &[i64]) -> Result<Vec<UserProfileEntity>, AppError>;
}

/// Postgres 实现
pub struct PgUserProfileStore {
    pool: PgPool,
}

impl PgUserProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER_PROFILE: &str =
    "SELECT id, user_id, nickname, avatar, gender, birthday, bio, created_at, updated_at FROM user_profile";

#[async_trait]
impl UserProfileStore for PgUserProfileStore {
    async fn create(&self, data: &NewUserProfile) -> Result<i64, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO user_profile (user_id, nickname, avatar, gender, birthday, bio, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, now(), now()) \
             RETURNING id",
        )
        .bind(data.user_id)
        .bind(&data.nickname)
        .bind(&data.avatar)
        .bind(&data.gender)
        .bind(&data.birthday)
        .bind(&data.bio)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, user_id: i64, patch: &UserProfilePatch) -> Result<(), AppError> {
        let mut query = QueryBuilder::<sqlx::Postgres>::new("UPDATE user_profile SET updated_at = now()");
        if let Some(nickname) = &patch.nickname {
            query.push(", nickname = ").push_bind(nickname);
        }
        if let Some(avatar) = &patch.avatar {
            query.push(", avatar = ").push_bind(avatar);
        }
        if let Some(gender) = &patch.gender {
            query.push(", gender = ").push_bind(gender);
        }
        if let Some(birthday) = &patch.birthday {
            query.push(", birthday = ").push_bind(birthday);
        }
        if let Some(bio) = &patch.bio {
            query.push(", bio = ").push_bind(bio);
        }
        query.push(" WHERE user_id = ").push_bind(user_id);

        query.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("failed to update user profile {}: {:?}", user_id, e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn fetch_by_user_id(&self, user_id: i64) -> Result<Option<UserProfileEntity>, AppError> {
        let profile = sqlx::query_as::<_, UserProfileEntity>(&format!(
            "{} WHERE user_id = $1",
            SELECT_USER_PROFILE
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn fetch_batch(&self, user_ids: &[i64]) -> Result<Vec<UserProfileEntity>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = sqlx::query_as::<_, UserProfileEntity>(&format!(
            "{} WHERE user_id = ANY($1)",
            SELECT_USER_PROFILE
        ))
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }
}
