//! Post handlers: feed, CRUD, likes, comments, shares.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use pulse_core::domain::{NewPost, PostEdit};
use pulse_shared::MessageResponse;
use pulse_shared::dto::{
    CommentRequest, CreatePostRequest, FeedQuery, ShareRequest, UpdatePostRequest,
};

use crate::extract::ValidatedJson;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::present;

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: ValidatedJson<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(
            identity.user_id,
            NewPost {
                content: req.content,
                image: req.image,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(present::post(post)))
}

/// GET /api/posts?pageNumber=
pub async fn get_posts(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.feed(query.page()).await?;
    Ok(HttpResponse::Ok().json(present::feed(page)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(present::post(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .update(
            identity.user_id,
            path.into_inner(),
            PostEdit {
                content: req.content,
                image: req.image,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(present::post(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post removed")))
}

/// PUT /api/posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .toggle_like(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(present::post(post)))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: ValidatedJson<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .add_comment(identity.user_id, path.into_inner(), body.into_inner().text)
        .await?;
    Ok(HttpResponse::Created().json(present::post(post)))
}

/// GET /api/posts/{id}/comments
pub async fn get_comments(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state.posts.comments(path.into_inner()).await?;
    let body: Vec<_> = comments.into_iter().map(present::comment).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/posts/{id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post = state
        .posts
        .delete_comment(identity.user_id, post_id, comment_id)
        .await?;
    Ok(HttpResponse::Ok().json(present::post(post)))
}

/// POST /api/posts/{id}/share
pub async fn share_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: ValidatedJson<ShareRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .share(
            identity.user_id,
            path.into_inner(),
            body.into_inner().platform,
        )
        .await?;
    Ok(HttpResponse::Ok().json(present::post(post)))
}

/// GET /api/posts/user/{user_id}
pub async fn posts_by_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.by_author(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(present::posts(posts)))
}
