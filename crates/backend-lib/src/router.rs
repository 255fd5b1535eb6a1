// ============================
// boathouse-backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::require_auth;
use crate::AppState;

/// Build the router: public login routes plus the gated pages
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/", get(handlers::index))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/login", get(handlers::login_form).post(handlers::login))
        // POST only: Lax cookies still ride along on cross-site GETs
        .route("/logout", post(handlers::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
