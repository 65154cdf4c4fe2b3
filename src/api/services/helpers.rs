//! API 帮助函数

use actix_web::cookie::{Cookie, SameSite};
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web::{Either, Form, FormConfig, Json, JsonConfig};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::debug;

use crate::api::constants;
use crate::config::SameSitePolicy;
use crate::errors::TinylinkError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 TinylinkError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_tinylink(err: &TinylinkError) -> HttpResponse {
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 TinylinkError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<TinylinkError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: TinylinkError = e.into();
            error_from_tinylink(&err)
        }
    }
}

/// 请求体同时接受 JSON 和表单
///
/// 请求体可选：缺失或无法解析时退回默认值，由服务层先做权限判断再给出字段错误
pub fn payload<T: Default>(body: Option<Either<Json<T>, Form<T>>>) -> T {
    match body {
        Some(Either::Left(json)) => json.into_inner(),
        Some(Either::Right(form)) => form.into_inner(),
        None => T::default(),
    }
}

/// JSON 解析失败时返回统一信封
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        debug!("Rejected JSON body: {}", err);
        let response = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            &format!("Invalid JSON body: {}", err),
        );
        InternalError::from_response(err, response).into()
    })
}

/// 表单解析失败时返回统一信封
pub fn form_config() -> FormConfig {
    FormConfig::default().error_handler(|err, _req| {
        debug!("Rejected form body: {}", err);
        let response = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            &format!("Invalid form body: {}", err),
        );
        InternalError::from_response(err, response).into()
    })
}

/// 未匹配路由
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!("No route for {} {}", req.method(), req.path());
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound,
        &format!("No route for {} {}", req.method(), req.path()),
    )
}

/// Session cookie 构建器
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    session_minutes: u64,
}

impl CookieBuilder {
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        let same_site = match config.auth.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: config.auth.cookie_secure,
            domain: config.auth.cookie_domain.clone(),
            session_minutes: config.auth.session_minutes,
        }
    }

    fn build_cookie_base(
        &self,
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(constants::SESSION_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            token,
            actix_web::cookie::time::Duration::minutes(self.session_minutes as i64),
        )
    }

    /// 登出时清除
    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), actix_web::cookie::time::Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{self, TestRequest};
    use actix_web::{App, web};
    use serde_json::Value;

    use crate::api::services::types::LinkTargetRequest;

    async fn echo_json(body: Json<LinkTargetRequest>) -> HttpResponse {
        success_response(body.into_inner().target)
    }

    async fn echo_form(body: Form<LinkTargetRequest>) -> HttpResponse {
        success_response(body.into_inner().target)
    }

    #[actix_rt::test]
    async fn test_body_errors_use_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(form_config())
                .route("/json", web::post().to(echo_json))
                .route("/form", web::post().to(echo_form)),
        )
        .await;

        for uri in ["/json", "/form"] {
            let req = TestRequest::post()
                .uri(uri)
                .insert_header(("Content-Type", "text/plain"))
                .set_payload("target=x")
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], ErrorCode::BadRequest as i32);
            assert!(body["data"].is_null());
        }
    }

    #[test]
    fn test_payload_falls_back_to_default() {
        let req: LinkTargetRequest = payload(None);
        assert_eq!(req.target, "");

        let req = payload(Some(Either::Right(Form(LinkTargetRequest {
            target: "https://example.com".to_string(),
        }))));
        assert_eq!(req.target, "https://example.com");
    }

    #[test]
    fn test_session_cookie_attributes() {
        let builder = CookieBuilder {
            same_site: SameSite::Strict,
            secure: true,
            domain: Some("example.com".to_string()),
            session_minutes: 30,
        };

        let cookie = builder.build_session_cookie("tok".to_string());
        assert_eq!(cookie.name(), constants::SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::minutes(30))
        );
    }

    #[test]
    fn test_expired_session_cookie() {
        let builder = CookieBuilder::from_config();
        let cookie = builder.build_expired_session_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }
}
