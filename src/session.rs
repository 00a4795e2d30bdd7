//! Session identity: the cookie that ties anonymous clients to their
//! transactions, and the middleware that requires it.
//!
//! A session token is never checked against server-side state. Any non-empty
//! cookie value is trusted verbatim, which makes the cookie the sole tenancy
//! boundary between clients.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use time::Duration;

use crate::{Error, models::SessionId};

pub(crate) const COOKIE_SESSION: &str = "sessionId";

/// How long a freshly minted session cookie stays valid on the client.
pub(crate) const SESSION_COOKIE_DURATION: Duration = Duration::days(7);

/// Extract the session token from the request cookies.
///
/// Returns [None] when the cookie is absent or empty. Anything else is
/// accepted as-is, malformed or expired-looking tokens included.
pub(crate) fn get_session_from_cookies(jar: &CookieJar) -> Option<SessionId> {
    jar.get(COOKIE_SESSION)
        .map(|cookie| cookie.value_trimmed())
        .filter(|token| !token.is_empty())
        .map(SessionId::new)
}

/// Add a session cookie for `session_id`, scoped to the root path with a
/// 7-day expiry.
pub(crate) fn set_session_cookie(jar: CookieJar, session_id: &SessionId) -> CookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, session_id.as_str().to_owned()))
            .path("/")
            .max_age(SESSION_COOKIE_DURATION),
    )
}

/// Middleware function that halts requests without a session cookie.
///
/// Requests without a token receive an empty 401 response before the route
/// handler runs. Otherwise the [SessionId] is placed into the request
/// extensions and the request executed normally.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session_id): Extension<SessionId>` to receive the session ID.
pub async fn session_guard(jar: CookieJar, mut request: Request, next: Next) -> Response {
    let session_id = match get_session_from_cookies(&jar) {
        Some(session_id) => session_id,
        None => return Error::SessionRequired.into_response(),
    };

    request.extensions_mut().insert(session_id);

    next.run(request).await
}

#[cfg(test)]
mod session_guard_tests {
    use axum::{Extension, Router, http::StatusCode, middleware, routing::get};
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;

    use crate::{
        models::SessionId,
        session::{COOKIE_SESSION, session_guard},
    };

    async fn test_handler(Extension(session_id): Extension<SessionId>) -> String {
        session_id.to_string()
    }

    const TEST_PROTECTED_ROUTE: &str = "/protected";

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn(session_guard));

        TestServer::new(app)
    }

    #[tokio::test]
    async fn request_without_cookie_is_unauthorized() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn request_with_empty_cookie_is_unauthorized() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::new(COOKIE_SESSION, ""))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn any_token_is_trusted_verbatim() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::new(COOKIE_SESSION, "definitely-not-a-uuid"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "definitely-not-a-uuid");
    }
}

#[cfg(test)]
mod session_cookie_tests {
    use axum_extra::extract::CookieJar;
    use time::Duration;

    use crate::{
        models::SessionId,
        session::{COOKIE_SESSION, get_session_from_cookies, set_session_cookie},
    };

    #[test]
    fn sets_cookie_with_root_path_and_seven_day_expiry() {
        let session_id = SessionId::mint();

        let jar = set_session_cookie(CookieJar::new(), &session_id);
        let cookie = jar.get(COOKIE_SESSION).unwrap();

        assert_eq!(cookie.value(), session_id.as_str());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn set_cookie_round_trips_through_extraction() {
        let session_id = SessionId::mint();

        let jar = set_session_cookie(CookieJar::new(), &session_id);

        assert_eq!(get_session_from_cookies(&jar), Some(session_id));
    }

    #[test]
    fn extraction_returns_none_for_empty_jar() {
        assert_eq!(get_session_from_cookies(&CookieJar::new()), None);
    }
}
