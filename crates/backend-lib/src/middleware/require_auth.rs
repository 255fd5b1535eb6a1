//! Login gate for protected routes.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use boathouse_common::AuthResult;
use tracing::debug;

use crate::auth::cookie::session_token;
use crate::AppState;

/// Where anonymous requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Subject of the session that passed the gate, available as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

/// Resolve the `sid` cookie on every request; anonymous requests are
/// redirected to the login page and never reach the handler.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(&jar);
    match state.auth.check(token.as_ref()).await {
        AuthResult::Authenticated { subject } => {
            request.extensions_mut().insert(CurrentUser(subject));
            next.run(request).await
        },
        AuthResult::Anonymous => {
            debug!(path = %request.uri().path(), "anonymous request redirected to login");
            Redirect::temporary(LOGIN_PATH).into_response()
        },
    }
}
