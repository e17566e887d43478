//! Login gate handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"admin@example.com","password":"123456"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroize;

use crate::domain::{Error, LoginCredentials, LoginValidationError, Notice};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, NoticeSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,
    pub password: String,
}

/// Body returned after a successful login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Email the session is bound to.
    pub email: String,
    #[schema(value_type = NoticeSchema)]
    pub notice: Notice,
}

/// Body carrying only a notice.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeResponse {
    #[schema(value_type = NoticeSchema)]
    pub notice: Notice,
}

/// Check the admin credentials and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank email or password", body = ErrorSchema),
        (status = 401, description = "Invalid email or password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest {
        email,
        mut password,
    } = payload.into_inner();
    let parsed = LoginCredentials::try_from_parts(&email, &password);
    password.zeroize();
    let credentials = parsed.map_err(map_login_validation_error)?;

    let identity = state.login.authenticate(&credentials).await?;
    let admin = session.persist_admin(&identity)?;
    Ok(web::Json(LoginResponse {
        email: admin.email().to_owned(),
        notice: Notice::success("Login successful."),
    }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// End the session. Succeeds whether or not one existed.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session cleared", body = NoticeResponse)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Ok(Some(admin)) = session.admin() {
        tracing::info!(email = %admin.email(), "admin logged out");
    }
    session.purge();
    HttpResponse::Ok().json(NoticeResponse {
        notice: Notice::success("Logged out successfully."),
    })
}
