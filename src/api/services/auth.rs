//! Account endpoints: register, login, logout, current identity

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::web::{Either, Form, Json};
use actix_web::{HttpResponse, Responder, web};
use tracing::{error, info};

use crate::api::constants;
use crate::api::middleware::CurrentUser;
use crate::services::{AuthService, Session};

use super::error_code::ErrorCode;
use super::helpers::{
    CookieBuilder, error_from_tinylink, error_response, json_response, payload, success_response,
};
use super::types::{AccountResponse, AuthSuccessResponse, Credentials};

/// 带 session cookie 的成功响应
fn session_response(
    status: StatusCode,
    message: &str,
    session: Session,
    auth: &AuthService,
) -> HttpResponse {
    let cookie = CookieBuilder::from_config().build_session_cookie(session.token.clone());
    let body = AuthSuccessResponse::new(session, auth.session_minutes());

    let mut response = json_response(status, ErrorCode::Success, message, Some(body));
    if let Err(e) = response.add_cookie(&cookie) {
        error!("Failed to attach session cookie: {}", e);
    }
    response
}

/// `GET /` 按身份分流
pub async fn index(user: CurrentUser) -> impl Responder {
    let location = if user.account().is_some() {
        constants::LINKS_PATH
    } else {
        constants::LOGIN_PATH
    };
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

/// `POST /register`
pub async fn register(
    auth: web::Data<AuthService>,
    body: Option<Either<Json<Credentials>, Form<Credentials>>>,
) -> impl Responder {
    let creds = payload(body);
    match auth.register(&creds.email, &creds.password).await {
        Ok(session) => {
            info!("Account registered: {}", session.account.id);
            session_response(StatusCode::CREATED, "Registered", session, &auth)
        }
        Err(e) => error_from_tinylink(&e),
    }
}

/// `POST /login`
pub async fn login(
    auth: web::Data<AuthService>,
    body: Option<Either<Json<Credentials>, Form<Credentials>>>,
) -> impl Responder {
    let creds = payload(body);
    match auth.login(&creds.email, &creds.password).await {
        Ok(session) => session_response(StatusCode::OK, "Logged in", session, &auth),
        Err(e) => error_from_tinylink(&e),
    }
}

/// `POST /logout`
///
/// Tokens are stateless, so logging out only clears the cookie.
pub async fn logout() -> impl Responder {
    let cookie = CookieBuilder::from_config().build_expired_session_cookie();
    let mut response = json_response::<()>(StatusCode::OK, ErrorCode::Success, "Logged out", None);
    if let Err(e) = response.add_cookie(&cookie) {
        error!("Failed to clear session cookie: {}", e);
    }
    response
}

/// `GET /me`
pub async fn me(user: CurrentUser) -> impl Responder {
    match user.0 {
        Some(account) => success_response(AccountResponse::from(account)),
        None => error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "You are not logged in",
        ),
    }
}
