//! User registry and identity selection handlers.
//!
//! ```text
//! GET /api/v1/users
//! GET /api/v1/session
//! PUT /api/v1/session {"userId":"minju"}
//! ```
//!
//! Selecting an identity needs no credentials; the registry's access level
//! decides what the identity may do.

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User, UserId, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error};

const USER_ID_FIELD: FieldName = FieldName::new("userId");

/// Request body for `PUT /api/v1/session`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectUserRequest {
    pub user_id: String,
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyId => "empty_user_id",
        UserValidationError::IdTooLong { .. } => "user_id_too_long",
        UserValidationError::InvalidIdCharacters => "invalid_user_id",
        UserValidationError::UnknownUser(_) => "unknown_user",
    };
    field_error(USER_ID_FIELD, code, err.to_string())
}

/// List the identities a client may switch between.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Known users", body = [UserSchema]),
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> web::Json<Vec<User>> {
    web::Json(state.users.all())
}

/// The identity attached to this session; the guest when none is selected.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let caller = session.caller(&state.users)?;
    Ok(web::Json(caller.user().clone()))
}

/// Switch the session to another registered identity.
#[utoipa::path(
    put,
    path = "/api/v1/session",
    request_body = SelectUserRequest,
    responses(
        (status = 200, description = "Identity selected", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Unknown or malformed user id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "selectUser"
)]
#[put("/session")]
pub async fn select_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SelectUserRequest>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(payload.into_inner().user_id).map_err(map_user_validation_error)?;
    let user = state.users.resolve(&id).map_err(map_user_validation_error)?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{fixture_state, session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(fixture_state()))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(list_users)
                    .service(current_session)
                    .service(select_user),
            )
    }

    #[actix_web::test]
    async fn lists_registry_with_access_levels() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/users").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let users = body.as_array().expect("array");
        assert_eq!(users.len(), 4);
        assert_eq!(users[0]["id"], "minju");
        assert_eq!(users[3]["access"], "readonly");
    }

    #[actix_web::test]
    async fn selection_persists_in_session() {
        let app = test::init_service(test_app()).await;
        let select = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/session")
                .set_json(SelectUserRequest {
                    user_id: "younghee".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(select.status(), StatusCode::OK);
        let cookie = session_cookie(&select);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/session")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["id"], "younghee");
        assert_eq!(body["displayName"], "영희");
    }

    #[rstest]
    #[case("mallory", "unknown_user")]
    #[case("", "empty_user_id")]
    #[case("Minju", "invalid_user_id")]
    #[actix_web::test]
    async fn rejects_unselectable_ids(#[case] user_id: &str, #[case] code: &str) {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/session")
                .set_json(SelectUserRequest {
                    user_id: user_id.to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "userId");
        assert_eq!(body["details"]["code"], code);
    }
}
