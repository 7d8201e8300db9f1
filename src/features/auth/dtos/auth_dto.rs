use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for the admin login check
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    pub password: String,
}

/// Response body for the admin login check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub success: bool,
}
