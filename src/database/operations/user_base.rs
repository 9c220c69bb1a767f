use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::database::models::{NewUserBase, UserBaseEntity, UserBasePatch};
use crate::error::AppError;

/// 用户基础记录的数据库访问接口
///
/// 任何传输/查询错误都作为 `AppError::Store` 原样上抛。
#[async_trait]
pub trait UserBaseStore: Send + Sync {
    async fn create(&self, data: &NewUserBase) -> Result<i64, AppError>;

    async fn update(&self, id: i64, patch: &UserBasePatch) -> Result<(), AppError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserBaseEntity>, AppError>;

    async fn fetch_by_username(&self, username: &str) -> Result<Option<UserBaseEntity>, AppError>;

    async fn fetch_by_email(&self, email: &str) -> Result<Option<UserBaseEntity>, AppError>;

    async fn fetch_by_phone(&self, phone: &str) -> Result<Option<UserBaseEntity>, AppError>;

    /// 批量查询，只返回存在的行，顺序不保证
    async fn fetch_batch(&self, ids: &[i64]) -> Result<Vec<UserBaseEntity>, AppError>;
}

/// Postgres 实现
pub struct PgUserBaseStore {
    pool: PgPool,
}

impl PgUserBaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER_BASE: &str =
    "SELECT id, username, phone, email, password, status, created_at, updated_at FROM user_base";

#[async_trait]
impl UserBaseStore for PgUserBaseStore {
    async fn create(&self, data: &NewUserBase) -> Result<i64, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO user_base (username, phone, email, password, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, 0, now(), now()) \
             RETURNING id",
        )
        .bind(&data.username)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: i64, patch: &UserBasePatch) -> Result<(), AppError> {
        let mut query = QueryBuilder::<sqlx::Postgres>::new("UPDATE user_base SET updated_at = now()");
        if let Some(username) = &patch.username {
            query.push(", username = ").push_bind(username);
        }
        if let Some(phone) = &patch.phone {
            query.push(", phone = ").push_bind(phone);
        }
        if let Some(email) = &patch.email {
            query.push(", email = ").push_bind(email);
        }
        if let Some(password) = &patch.password {
            query.push(", password = ").push_bind(password);
        }
        if let Some(status) = patch.status {
            query.push(", status = ").push_bind(status);
        }
        query.push(" WHERE id = ").push_bind(id);

        query.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("failed to update user base {}: {:?}", id, e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserBaseEntity>, AppError> {
        let user = sqlx::query_as::<_, UserBaseEntity>(&format!(
            "{} WHERE id = $1",
            SELECT_USER_BASE
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch_by_username(&self, username: &str) -> Result<Option<UserBaseEntity>, AppError> {
        let user = sqlx::query_as::<_, UserBaseEntity>(&format!(
            "{} WHERE username = $1",
            SELECT_USER_BASE
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<UserBaseEntity>, AppError> {
        let user = sqlx::query_as::<_, UserBaseEntity>(&format!(
            "{} WHERE email = $1",
            SELECT_USER_BASE
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch_by_phone(&self, phone: &str) -> Result<Option<UserBaseEntity>, AppError> {
        let user = sqlx::query_as::<_, UserBaseEntity>(&format!(
            "{} WHERE phone = $1",
            SELECT_USER_BASE
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch_batch(&self, ids: &[i64]) -> Result<Vec<UserBaseEntity>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, UserBaseEntity>(&format!(
            "{} WHERE id = ANY($1)",
            SELECT_USER_BASE
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
