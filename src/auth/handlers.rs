use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    error::{AppError, AppResult},
    model::{role::Role, user::NewUser, user::User},
    models::{LoginReqDto, LoginResponse, RefreshReq, RegisterReq, TokenType},
    state::AppState,
};

/// Issues an access/refresh pair and records the refresh token's jti.
async fn issue_tokens(state: &AppState, user: &User) -> AppResult<LoginResponse> {
    let config = state.config();

    let access_token = generate_access_token(user, &config.jwt_secret, config.access_token_ttl)?;
    let (refresh_token, refresh_claims) =
        generate_refresh_token(user, &config.jwt_secret, config.refresh_token_ttl)?;

    debug!(user_id = user.id, jti = %refresh_claims.jti, "Storing refresh token");
    state
        .store()
        .save_refresh_token(user.id, &refresh_claims.jti, refresh_claims.exp as i64)
        .await?;

    Ok(LoginResponse {
        access_token,
        refresh_token,
        redirect: user.role.landing_path().to_string(),
    })
}

/// User registration handler
#[instrument(
    name = "auth_register",
    skip(state, user),
    fields(username = %user.username, employee_id = user.employee_id)
)]
pub async fn register(
    user: web::Json<RegisterReq>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let username = user.username.trim();

    if username.is_empty() || user.password.is_empty() {
        return Err(AppError::validation(
            "Username and password must not be empty",
        ));
    }

    let store = state.store();

    if store.find_employee(user.employee_id).await?.is_none() {
        info!("Registration rejected: unknown employee id");
        return Err(AppError::not_found(
            "Invalid employee ID. Please contact admin.",
        ));
    }

    if store.user_exists_for_employee(user.employee_id).await? {
        info!("Registration rejected: employee already has an account");
        return Err(AppError::conflict(
            "An account already exists for this employee ID.",
        ));
    }

    if store.find_user_by_username(username).await?.is_some() {
        return Err(AppError::conflict("Username already taken"));
    }

    store
        .create_user(&NewUser {
            username: username.to_string(),
            password_hash: hash_password(&user.password)?,
            role: Role::Employee {
                employee_id: user.employee_id,
            },
        })
        .await?;

    info!("Account created");
    Ok(HttpResponse::Created().json(json!({
        "message": "Account created! You can now log in."
    })))
}

#[instrument(
    name = "auth_login",
    skip(state, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    info!("Login request received");

    // 1️⃣ Basic validation
    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(AppError::validation("Username or password required"));
    }

    // 2️⃣ Fetch user
    let Some(db_user) = state.store().find_user_by_username(user.username.trim()).await? else {
        info!("Invalid credentials: user not found");
        return Err(AppError::unauthorized("Invalid credentials"));
    };
    debug!(user_id = db_user.id, "User found");

    // 3️⃣ Verify password
    if !verify_password(&user.password, &db_user.password_hash)? {
        info!("Invalid credentials: password mismatch");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    // 4️⃣ Employees must also present their employee id
    if let Role::Employee { employee_id } = db_user.role {
        if user.employee_id != Some(employee_id) {
            info!("Invalid credentials: employee id mismatch");
            return Err(AppError::unauthorized("Incorrect employee ID"));
        }
    }

    // 5️⃣ Tokens
    let response = issue_tokens(&state, &db_user).await?;

    info!(role = %db_user.role.kind(), "Login successful");
    Ok(HttpResponse::Ok().json(response))
}

pub async fn refresh_token(
    body: web::Json<RefreshReq>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let claims = verify_token(&body.refresh_token, &state.config().jwt_secret)
        .map_err(|_| AppError::unauthorized("Invalid refresh token"))?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::unauthorized("Invalid refresh token"));
    }

    // 🔥 single use: revoke before issuing the next pair
    if !state.store().consume_refresh_token(&claims.jti).await? {
        return Err(AppError::unauthorized("Refresh token revoked or expired"));
    }

    let user = User {
        id: claims.user_id,
        username: claims.sub,
        password_hash: String::new(),
        role: claims.role,
    };
    let response = issue_tokens(&state, &user).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Revokes the presented refresh token. Always answers 204.
pub async fn logout(body: web::Json<RefreshReq>, state: web::Data<AppState>) -> HttpResponse {
    let claims = match verify_token(&body.refresh_token, &state.config().jwt_secret) {
        Ok(c) if c.token_type == TokenType::Refresh => c,
        _ => return HttpResponse::NoContent().finish(),
    };

    if let Err(e) = state.store().consume_refresh_token(&claims.jti).await {
        tracing::error!(error = %e, "Failed to revoke refresh token");
    }

    HttpResponse::NoContent().finish()
}
