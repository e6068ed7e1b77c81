//! Shared HTTP harness for integration tests.
//!
//! Mounts the same routes and extractor configuration as the server binary
//! over state built from an in-memory store.

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key, SameSite, time::Duration as CookieDuration};
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    test as actix_test, web,
};
use lunchlog::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use lunchlog::inbound::http::places::search_places;
use lunchlog::inbound::http::restaurants::{
    create_restaurant, delete_restaurant, get_restaurant, list_restaurants, toggle_favorite,
};
use lunchlog::inbound::http::state::HttpState;
use lunchlog::inbound::http::stats::listing_stats;
use lunchlog::inbound::http::users::{current_session, list_users, select_user};
use lunchlog::inbound::http::visits::{create_visit, delete_visit, update_visit, visit_image};
use serde_json::{Value, json};

pub async fn build_test_app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build();

    actix_test::init_service(
        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .wrap(lunchlog::Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(list_users)
                    .service(current_session)
                    .service(select_user)
                    .service(list_restaurants)
                    .service(create_restaurant)
                    .service(get_restaurant)
                    .service(delete_restaurant)
                    .service(toggle_favorite)
                    .service(create_visit)
                    .service(update_visit)
                    .service(delete_visit)
                    .service(visit_image)
                    .service(listing_stats)
                    .service(search_places),
            ),
    )
    .await
}

/// Status, headers and raw body of a response.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: web::Bytes,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

pub async fn send<S>(
    app: &S,
    request: actix_test::TestRequest,
    cookie: Option<&Cookie<'static>>,
) -> Reply
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let request = match cookie {
        Some(cookie) => request.cookie(cookie.clone()),
        None => request,
    };
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let headers = response.headers().clone();
    let body = actix_test::read_body(response).await;
    Reply {
        status,
        headers,
        body,
    }
}

/// Select a registry identity and return the session cookie.
pub async fn sign_in<S>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::put()
        .uri("/api/v1/session")
        .set_json(json!({ "userId": user_id }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "select {user_id}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Create a restaurant as `cookie`'s identity and return its id.
pub async fn create_restaurant_as<S>(
    app: &S,
    cookie: &Cookie<'static>,
    name: &str,
    category: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let reply = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/restaurants")
            .set_json(json!({
                "name": name,
                "address": format!("{name}, Gangnam-gu, Seoul"),
                "latitude": 37.4979,
                "longitude": 127.0276,
                "category": category,
            })),
        Some(cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "create {name}");
    reply.json()["id"]
        .as_str()
        .expect("restaurant id")
        .to_owned()
}

/// Record a visit and return the response.
pub async fn record_visit<S>(
    app: &S,
    cookie: Option<&Cookie<'static>>,
    restaurant_id: &str,
    visit: Value,
) -> Reply
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(
        app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/restaurants/{restaurant_id}/visits"))
            .set_json(visit),
        cookie,
    )
    .await
}
