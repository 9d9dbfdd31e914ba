pub mod auth;
pub mod flash;
pub mod middleware;
pub mod moderation;
pub mod showcases;
pub mod validate;


use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::auth::AppState;

/// Assemble the full route table: public pages, authenticated pages, and
/// the moderator-only review endpoints, each behind its own middleware.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/leaderboard", get(showcases::leaderboard))
        .with_state(state.clone());

    let member_routes = Router::new()
        .route("/dashboard", get(showcases::dashboard))
        .route("/profile", get(showcases::profile))
        .route("/showcase/add", post(showcases::add_showcase))
        .route("/showcase/{id}", get(showcases::showcase_detail))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state.clone());

    let moderation_routes = Router::new()
        .route("/moderation/review", get(moderation::review_queue))
        .route("/moderation/review/{id}/approve", post(moderation::approve_showcase))
        .route("/moderation/review/{id}/reject", post(moderation::reject_showcase))
        .layer(from_fn_with_state(state.clone(), middleware::require_moderator))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(moderation_routes)
}
