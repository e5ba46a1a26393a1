//! Notification inbox handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use pulse_shared::MessageResponse;
use pulse_shared::dto::NotificationResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::present;

/// GET /api/notifications
pub async fn list_notifications(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let notifications: Vec<NotificationResponse> = state
        .notifications
        .list(identity.user_id)
        .await?
        .into_iter()
        .map(present::notification)
        .collect();
    Ok(HttpResponse::Ok().json(notifications))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .notifications
        .mark_read(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Notification marked as read")))
}
