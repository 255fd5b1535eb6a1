// ============================
// boathouse-backend-lib/src/auth/cookie.rs
// ============================
//! The `sid` cookie: reading the token back and building the outgoing cookie.
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use boathouse_common::{SESSION_COOKIE, SESSION_COOKIE_PATH};

use super::{IssuedSession, SessionToken};

/// Token carried by the request's `sid` cookie, if any
pub fn session_token(jar: &CookieJar) -> Option<SessionToken> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(SessionToken::from_cookie)
}

/// Cookie handed out on login. Browser sessions carry no `Max-Age`.
pub fn session_cookie(issued: &IssuedSession, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, issued.token.as_str().to_owned()))
        .path(SESSION_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);

    if let Some(max_age) = issued.max_age {
        let secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        builder = builder.max_age(time::Duration::seconds(secs));
    }
    builder.build()
}

/// Cookie used to tell the client to forget its session
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path(SESSION_COOKIE_PATH).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionManager, SessionPolicy};
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    async fn issue(persistent: bool) -> IssuedSession {
        SessionManager::new(Arc::new(MemoryStore::new()), SessionPolicy::default())
            .issue("alice", persistent)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_persistent_cookie_has_max_age() {
        let issued = issue(true).await;
        let cookie = session_cookie(&issued, false);

        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), issued.token.as_str());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(31_536_000)));
        assert!(cookie.to_string().contains("Max-Age=31536000"));
    }

    #[tokio::test]
    async fn test_browser_cookie_has_no_max_age() {
        let issued = issue(false).await;
        let cookie = session_cookie(&issued, true);

        assert_eq!(cookie.max_age(), None);
        assert!(cookie.expires().is_none());
        assert_eq!(cookie.secure(), Some(true));
        assert!(!cookie.to_string().contains("Max-Age"));
    }

    #[test]
    fn test_session_token_from_jar() {
        let jar = CookieJar::new();
        assert!(session_token(&jar).is_none());

        let jar = jar.add(Cookie::new("sid", ""));
        assert!(session_token(&jar).is_none());

        let jar = jar.add(Cookie::new("sid", "abc"));
        assert_eq!(session_token(&jar), Some(SessionToken::from_cookie("abc")));
    }
}
