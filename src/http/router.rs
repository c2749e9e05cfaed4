//! Route table.

use super::{AppState, Stack, handlers};
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

/// Builds the application router.
///
/// Lifecycle routes live under `api_prefix`; `/health` stays at the root.
/// A prefix of `/` mounts the lifecycle routes at the root as well.
#[must_use]
pub fn router<S: Stack>(state: AppState<S>, api_prefix: &str) -> Router {
    let api = Router::new()
        .route(
            "/tasks",
            get(handlers::tasks::list::<S>).post(handlers::tasks::create::<S>),
        )
        .route(
            "/tasks/:id",
            get(handlers::tasks::show::<S>)
                .put(handlers::tasks::update::<S>)
                .delete(handlers::tasks::remove::<S>),
        )
        .route("/bids", post(handlers::bids::create::<S>))
        .route("/bids/:id", put(handlers::bids::update::<S>))
        .route("/bids/:id/accept", post(handlers::bids::accept::<S>))
        .route("/bids/task/:task_id", get(handlers::bids::list_for_task::<S>))
        .route("/payments", post(handlers::payments::create::<S>))
        .route("/payments/:id", put(handlers::payments::update::<S>))
        .route(
            "/payments/task/:task_id",
            get(handlers::payments::list_for_task::<S>),
        )
        .route("/reviews", post(handlers::reviews::create::<S>))
        .route(
            "/reviews/user/:user_id",
            get(handlers::reviews::list_for_user::<S>),
        )
        .route(
            "/users/me",
            get(handlers::users::me::<S>).put(handlers::users::update_me::<S>),
        )
        .route("/users/:id", get(handlers::users::show::<S>));

    let root = Router::new().route("/health", get(|| async { Json(json!({ "status": "ok" })) }));
    let prefix = api_prefix.trim_end_matches('/');
    let mounted = if prefix.is_empty() {
        root.merge(api)
    } else {
        root.nest(prefix, api)
    };

    mounted
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
