//! Fixture cookies for exercising a dev proxy's `Set-Cookie` rewriting.
//!
//! Enabled with `test_cookies`; attached to every message response. Each
//! cookie carries a different mix of `Domain`, `Path`, `Secure` and
//! `SameSite` attributes, which are exactly the ones a proxy has to rewrite.

use axum::extract::Request;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::trace;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "chatmock_session";
pub const DOMAIN_COOKIE: &str = "chatmock_domain";
pub const PREFERENCE_COOKIE: &str = "chatmock_pref";

pub async fn test_cookies(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    for cookie in fixture_cookies(Uuid::new_v4()) {
        match HeaderValue::try_from(cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => trace!(error = %e, "skipping unencodable fixture cookie"),
        }
    }
    response
}

fn fixture_cookies(session: Uuid) -> [String; 3] {
    [
        format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly; SameSite=Strict"),
        format!("{DOMAIN_COOKIE}=proxy-test; Domain=localhost; Path=/api; Secure; SameSite=None"),
        format!("{PREFERENCE_COOKIE}=compact; Path=/; Max-Age=60; SameSite=Lax"),
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn each_cookie_exercises_different_attributes() {
        let [session, domain, pref] = fixture_cookies(Uuid::nil());
        assert!(session.starts_with("chatmock_session=00000000-0000-0000-0000-000000000000;"));
        assert!(session.contains("HttpOnly"));
        assert!(domain.contains("Domain=localhost") && domain.contains("Secure"));
        assert!(pref.contains("Max-Age=60"));
    }
}
