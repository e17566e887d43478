//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;

use crate::domain::AdminAccount;
use crate::domain::ports::AdminLoginService;
use crate::inbound::http::auth::LoginRequest;

pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "123456";
pub const SESSION_COOKIE: &str = "session";

/// Cookie session middleware with a fresh key and the `Secure` flag off so
/// plain HTTP test requests keep their cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Login service accepting only the test admin pair.
pub fn test_admin_login() -> Arc<AdminLoginService> {
    Arc::new(AdminLoginService::new(AdminAccount::new(
        TEST_ADMIN_EMAIL,
        TEST_ADMIN_PASSWORD,
    )))
}

pub fn login_request(email: &str, password: &str) -> actix_http::Request {
    TestRequest::post()
        .uri("/api/v1/login")
        .set_json(LoginRequest {
            email: email.into(),
            password: password.into(),
        })
        .to_request()
}

/// Extract the session cookie a response set, panicking when absent.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie set")
        .into_owned()
}
