//! Authentication handlers.

use actix_web::{HttpResponse, web};

use pulse_core::domain::User;
use pulse_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::extract::ValidatedJson;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::present;

fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: u64::try_from(state.tokens.expiration_seconds()).unwrap_or(0),
        user: present::user(user),
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: ValidatedJson<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if state.user_repo.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if state
        .user_repo
        .find_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;

    let user = User::new(req.username, req.email, password_hash);
    let saved_user = state.user_repo.create(user).await?;
    tracing::info!(user_id = %saved_user.id, "User registered");

    Ok(HttpResponse::Created().json(auth_response(&state, saved_user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .user_repo
        .find_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    Ok(HttpResponse::Ok().json(auth_response(&state, user)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.users.get(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(present::user(user)))
}
