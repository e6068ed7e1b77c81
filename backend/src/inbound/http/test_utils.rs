//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::PlaceSearchService;
use crate::domain::ports::{
    DisabledPlaceSearch, FixtureRestaurantCommand, FixtureRestaurantQuery, FixtureVisitCommand,
    FixtureVisitImageQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Ports backed by fixtures; override fields as a test requires.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        restaurants: Arc::new(FixtureRestaurantQuery),
        restaurant_commands: Arc::new(FixtureRestaurantCommand),
        visits: Arc::new(FixtureVisitCommand),
        visit_images: Arc::new(FixtureVisitImageQuery),
        places: Arc::new(PlaceSearchService::new(Arc::new(DisabledPlaceSearch))),
    }
}

/// Fixture-backed HTTP state.
pub fn fixture_state() -> HttpState {
    HttpState::new(fixture_ports())
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Select `user_id` through `PUT /api/v1/session` and return the cookie.
///
/// The app under test must mount [`crate::inbound::http::users::select_user`]
/// under `/api/v1`.
pub async fn select_user_cookie<S, B, E>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse<B>, Error = E>,
    E: std::fmt::Debug,
{
    let request = actix_web::test::TestRequest::put()
        .uri("/api/v1/session")
        .set_json(serde_json::json!({ "userId": user_id }))
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    assert!(response.status().is_success(), "select {user_id} failed");
    session_cookie(&response)
}
