//! Session cookie handling.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{domain::SessionId, ui::state::AppState};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_id";

/// Resolve the caller's session from the cookie jar.
///
/// A freshly minted token is added to the returned jar, so handlers must
/// include the jar in their response.
pub async fn resolve_session(state: &AppState, jar: CookieJar) -> (CookieJar, SessionId) {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
    let resolved = state
        .resolve_session_usecase
        .execute(token.as_deref())
        .await;

    if !resolved.minted {
        return (jar, resolved.id);
    }

    let cookie = Cookie::build((SESSION_COOKIE, resolved.token.as_str().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), resolved.id)
}
