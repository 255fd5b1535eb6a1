// ============================
// boathouse-backend-lib/src/handlers/auth.rs
// ============================
//! Login and logout endpoints.
use std::{fmt, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::auth::cookie::{removal_cookie, session_cookie, session_token};
use crate::auth::AuthError;
use crate::error::AppError;
use crate::middleware::require_auth::LOGIN_PATH;
use crate::{views, AppState};

/// Shown for every rejected login, whatever the reason
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect username or password";

/// Fields posted by the login page
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub pwd: Zeroizing<String>,
    /// Checkbox; browsers send `on` when ticked and omit it otherwise
    #[serde(default)]
    pub persist: Option<String>,
}

impl LoginForm {
    pub fn remember_me(&self) -> bool {
        self.persist.as_deref() == Some("on")
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("pwd", &"<redacted>")
            .field("persist", &self.persist)
            .finish()
    }
}

/// GET /login
pub async fn login_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let token = session_token(&jar);
    if state.auth.check(token.as_ref()).await.is_authenticated() {
        return Redirect::temporary("/").into_response();
    }
    Html(views::login_page(None)).into_response()
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let previous = session_token(&jar);

    let issued = match state
        .auth
        .login(&form.username, &form.pwd, form.remember_me())
        .await
    {
        Ok(issued) => issued,
        Err(AuthError::InvalidCredentials) => {
            let page = views::login_page(Some(LOGIN_FAILED_MESSAGE));
            return Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response());
        },
        Err(err) => return Err(err.into()),
    };

    // a fresh login never inherits whatever session the client carried before
    if let Some(previous) = previous {
        if let Err(e) = state.auth.logout(&previous).await {
            warn!(error = %e, "could not revoke superseded session");
        }
    }

    let jar = jar.add(session_cookie(&issued, state.settings.session.secure_cookie));
    Ok((jar, Redirect::to("/")).into_response())
}

/// POST /logout
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let token = session_token(&jar);
    let jar = jar.remove(removal_cookie());

    if let Some(token) = token {
        if let Err(err) = state.auth.logout(&token).await {
            // the client still forgets the cookie even though the row survived
            return (jar, AppError::from(err)).into_response();
        }
    }
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}
