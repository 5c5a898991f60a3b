use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "janeroe")]
    pub username: String,
    #[schema(example = "change-me")]
    pub password: String,
    #[schema(example = 1002)]
    pub employee_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "johndoe")]
    pub username: String,
    #[schema(example = "johndoe")]
    pub password: String,
    /// Required for employee accounts, ignored for admins.
    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct RefreshReq {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Landing view for this role.
    #[schema(example = "/employee/dashboard")]
    pub redirect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
