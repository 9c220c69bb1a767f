use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用错误类型
///
/// 读路径上的错误不会被吞掉：缓存故障和数据库故障原样返回给调用方。
/// 需要 `Clone`，因为合并请求组会把同一个结果广播给所有等待者。
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// 缓存服务传输或编解码失败
    #[error("cache backend error: {0}")]
    CacheBackend(String),

    /// 数据库查询或事务失败
    #[error("store error: {0}")]
    Store(String),

    /// 记录不存在（数据库未命中或缓存的占位符，两者对调用方等价）
    #[error("record not found")]
    NotFound,

    /// 写路径参数非法，在任何 I/O 之前拒绝
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::CacheBackend(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            other => AppError::Store(other.to_string()),
        }
    }
}

// 缓存值的序列化/反序列化失败归为缓存后端错误
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::CacheBackend(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    code: i32,
    error_message: String,
}

pub mod error_codes {
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const NOT_FOUND: i32 = 1004;
    pub const INTERNAL_ERROR: i32 = 5000;
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match &self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                error_codes::NOT_FOUND,
                "记录不存在".to_string(),
            ),
            AppError::InvalidState(msg) => (
                StatusCode::BAD_REQUEST,
                error_codes::VALIDATION_ERROR,
                format!("无效请求: {}", msg),
            ),
            AppError::CacheBackend(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "缓存服务错误".to_string(),
            ),
            AppError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "数据库错误".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            code,
            error_message,
        });

        (status, body).into_response()
    }
}
