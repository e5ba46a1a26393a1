//! HTTP handlers and route configuration.

mod auth;
mod health;
mod notifications;
mod posts;
mod present;
mod realtime;
mod users;

use actix_web::web;

/// Configure all application routes.
///
/// Literal segments are registered before `{id}` captures on the same level
/// so `/users/search` never parses as a user ID.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("", web::get().to(posts::get_posts))
                    .route("/user/{user_id}", web::get().to(posts::posts_by_user))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/like", web::put().to(posts::like_post))
                    .route("/{id}/comments", web::post().to(posts::add_comment))
                    .route("/{id}/comments", web::get().to(posts::get_comments))
                    .route(
                        "/{id}/comments/{comment_id}",
                        web::delete().to(posts::delete_comment),
                    )
                    .route("/{id}/share", web::post().to(posts::share_post)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .route("/search", web::get().to(users::search_users))
                    .route("/profile", web::put().to(users::update_profile))
                    .route("/{id}", web::get().to(users::get_user))
                    .route("/{id}/follow", web::put().to(users::follow_user))
                    .route("/{id}/unfollow", web::put().to(users::unfollow_user)),
            )
            .service(
                web::scope("/notifications")
                    .route("", web::get().to(notifications::list_notifications))
                    .route("/{id}/read", web::put().to(notifications::mark_read)),
            )
            .service(
                web::scope("/realtime")
                    .route("/notifications", web::get().to(realtime::notifications))
                    .route("/posts/{id}/likes", web::get().to(realtime::post_likes)),
            ),
    );
}
