//! Health check and the protected landing page.
use axum::{response::Html, Extension};

use crate::middleware::CurrentUser;
use crate::views;

/// GET /ping
pub async fn ping() -> &'static str {
    "OK"
}

/// GET / (behind `require_auth`)
pub async fn index(Extension(CurrentUser(subject)): Extension<CurrentUser>) -> Html<String> {
    Html(views::index_page(&subject))
}
