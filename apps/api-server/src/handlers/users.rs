//! User handlers: directory, profiles, follow graph.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use pulse_core::domain::ProfileUpdate;
use pulse_shared::MessageResponse;
use pulse_shared::dto::{SearchQuery, UpdateProfileRequest, UserResponse};

use crate::extract::ValidatedJson;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::present;

/// GET /api/users
pub async fn list_users(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .users
        .list()
        .await?
        .into_iter()
        .map(present::user)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/search?q=
pub async fn search_users(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .users
        .search(&query.q)
        .await?
        .into_iter()
        .map(present::user)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let profile = state.users.profile(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(present::profile(profile)))
}

/// PUT /api/users/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: ValidatedJson<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .users
        .update_profile(
            identity.user_id,
            ProfileUpdate {
                username: req.username,
                bio: req.bio,
                profile_picture: req.profile_picture,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(present::user(user)))
}

/// PUT /api/users/{id}/follow
pub async fn follow_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .users
        .follow(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User followed")))
}

/// PUT /api/users/{id}/unfollow
pub async fn unfollow_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .users
        .unfollow(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User unfollowed")))
}
