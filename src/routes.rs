// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, comments, follows, images, interaction, posts, replies, scheduler, users},
    state::AppState,
    utils::jwt::auth_middleware,
};

const FALLBACK_ORIGIN: &str = "http://localhost:8081";

/// Assembles the main application router.
///
/// * Public reads and auth endpoints.
/// * Writes behind `auth_middleware`.
/// * The manual scheduler trigger at `/trigger-scheduler`.
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origin = HeaderValue::from_str(&state.config.frontend_url).unwrap_or_else(|_| {
        tracing::warn!(
            frontend_url = %state.config.frontend_url,
            "invalid FRONTEND_URL, falling back to {}",
            FALLBACK_ORIGIN
        );
        HeaderValue::from_static(FALLBACK_ORIGIN)
    });

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ORIGIN])
        .allow_credentials(true);

    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/followers", get(follows::list_followers))
        .route("/users/{id}/followings", get(follows::list_followings))
        .route("/posts", get(posts::list_posts))
        .route("/posts/{id}", get(posts::get_post))
        .route("/posts/{id}/comments", get(comments::list_comments))
        .route("/posts/{id}/replies", get(replies::list_replies_for_post))
        .route("/posts/{id}/images", get(images::list_images));

    let protected_routes = Router::new()
        .route(
            "/users/{id}",
            patch(users::update_user).delete(users::delete_user),
        )
        .route("/posts", post(posts::create_post))
        .route("/posts/scheduled", post(posts::create_scheduled_post))
        .route(
            "/posts/{id}",
            patch(posts::update_post).delete(posts::delete_post),
        )
        .route("/posts/{id}/comments", post(comments::create_comment))
        .route("/posts/{id}/images", post(images::upload_image))
        .route(
            "/posts/{id}/likes",
            post(interaction::like_post).delete(interaction::unlike_post),
        )
        .route(
            "/posts/{id}/saves",
            post(interaction::save_post).delete(interaction::unsave_post),
        )
        .route(
            "/comments/{id}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/comments/{id}/replies", post(replies::create_reply))
        .route(
            "/replies/{id}",
            patch(replies::update_reply).delete(replies::delete_reply),
        )
        .route("/follows", post(follows::create_follow))
        .route("/follows/{id}", delete(follows::delete_follow))
        .route("/me/posts", get(posts::list_my_posts))
        .route("/me/saves", get(interaction::list_my_saves))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .route("/trigger-scheduler", get(scheduler::trigger_scheduler))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
