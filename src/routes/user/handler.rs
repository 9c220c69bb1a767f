use axum::{
    Json,
    extract::{Query, State},
};

use crate::database::models::NewUserBase;
use crate::{AppState, error::AppError, result::ApiResult, service::User};

use super::model::{
    BaseUserResponse, BatchGetUsersRequest, CreateUserRequest, CreateUserResponse, EmailQuery,
    PhoneQuery, UpdateProfileRequest, UpdateUserRequest, UserIdQuery, UsernameQuery,
};

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResult<CreateUserResponse>>, AppError> {
    let id = state
        .users
        .create_user(&NewUserBase {
            username: req.username,
            phone: req.phone,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(ApiResult::success(CreateUserResponse { id })))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<ApiResult<User>>, AppError> {
    let user = state.users.get_user(query.id).await?;
    Ok(Json(ApiResult::success(user)))
}

#[axum::debug_handler]
pub async fn batch_get_users(
    State(state): State<AppState>,
    Json(req): Json<BatchGetUsersRequest>,
) -> Result<Json<ApiResult<Vec<User>>>, AppError> {
    let users = state.users.batch_get_users(&req.ids).await?;
    Ok(Json(ApiResult::success(users)))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResult<()>>, AppError> {
    state.users.update_user(req.id, &req.patch).await?;
    Ok(Json(ApiResult::success(())))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResult<()>>, AppError> {
    state.users.update_profile(req.user_id, &req.patch).await?;
    Ok(Json(ApiResult::success(())))
}

#[axum::debug_handler]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<ApiResult<BaseUserResponse>>, AppError> {
    let user = state.users.get_user_by_username(&query.username).await?;
    Ok(Json(ApiResult::success(user.into())))
}

#[axum::debug_handler]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<ApiResult<BaseUserResponse>>, AppError> {
    let user = state.users.get_user_by_email(&query.email).await?;
    Ok(Json(ApiResult::success(user.into())))
}

#[axum::debug_handler]
pub async fn get_user_by_phone(
    State(state): State<AppState>,
    Query(query): Query<PhoneQuery>,
) -> Result<Json<ApiResult<BaseUserResponse>>, AppError> {
    let user = state.users.get_user_by_phone(&query.phone).await?;
    Ok(Json(ApiResult::success(user.into())))
}
