use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::config::AdminConfig;
use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto};
use crate::features::auth::guards;
use crate::shared::types::ApiResponse;

/// Check the admin password
///
/// The frontend calls this once to unlock the admin views; subsequent
/// mutating requests carry the same secret in the `x-admin-password` header.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Password accepted", body = ApiResponse<LoginResponseDto>),
        (status = 401, description = "Invalid admin password")
    )
)]
pub async fn login(
    State(config): State<Arc<AdminConfig>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    if !guards::verify_admin_secret(Some(&dto.password), &config.password) {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    Ok(Json(ApiResponse::success(
        Some(LoginResponseDto { success: true }),
        None,
    )))
}
