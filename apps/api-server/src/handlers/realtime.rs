//! Server-Sent Event streams backed by the pub/sub channels.

use std::convert::Infallible;

use actix_web::{HttpResponse, http::header, web};
use futures::{StreamExt, stream};
use uuid::Uuid;

use pulse_core::ports::MessageStream;
use pulse_core::services::realtime::{notifications_channel, post_likes_channel};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Frame each pub/sub payload as an SSE event named `event`.
fn event_stream(event: &'static str, messages: MessageStream) -> HttpResponse {
    let opening = stream::once(async {
        Ok::<_, Infallible>(web::Bytes::from_static(b": connected\n\n"))
    });
    let events = messages.map(move |message| {
        Ok::<_, Infallible>(web::Bytes::from(format!(
            "event: {}\ndata: {}\n\n",
            event, message.payload
        )))
    });

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(opening.chain(events))
}

async fn subscribe(state: &AppState, channel: &str) -> AppResult<MessageStream> {
    state
        .pubsub
        .subscribe(channel)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// GET /api/realtime/notifications
pub async fn notifications(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let messages = subscribe(&state, &notifications_channel(identity.user_id)).await?;
    tracing::debug!(user_id = %identity.user_id, "Notification stream opened");
    Ok(event_stream("notification", messages))
}

/// GET /api/realtime/posts/{id}/likes
pub async fn post_likes(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state.posts.get(post_id).await?;

    let messages = subscribe(&state, &post_likes_channel(post_id)).await?;
    Ok(event_stream("like", messages))
}
