use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::trace;

use crate::api::constants;
use crate::domain::Account;
use crate::services::AuthService;

/// Session middleware
///
/// Resolves the caller's session token to an [`Account`] and stores it in the
/// request extensions. It never rejects a request: handlers decide what an
/// absent identity means through [`CurrentUser`].
#[derive(Clone)]
pub struct SessionIdentity;

impl<S, B> Transform<S, ServiceRequest> for SessionIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionIdentityMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionIdentityMiddleware<S> {
    service: Rc<S>,
}

impl<S> SessionIdentityMiddleware<S> {
    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_cookie_token(req: &ServiceRequest) -> Option<String> {
        req.cookie(constants::SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Bearer 优先，其次 Cookie
    fn resolve_identity(req: &ServiceRequest) -> Option<Account> {
        let token = Self::extract_bearer_token(req).or_else(|| Self::extract_cookie_token(req))?;
        let auth = req.app_data::<web::Data<AuthService>>()?;
        let account = auth.resolve_token(&token);
        trace!(
            "Session token resolved to {:?}",
            account.as_ref().map(|a| a.id.as_str())
        );
        account
    }
}

impl<S, B> Service<ServiceRequest> for SessionIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            if let Some(account) = Self::resolve_identity(&req) {
                req.extensions_mut().insert(account);
            }
            srv.call(req).await
        })
    }
}

/// The identity attached by [`SessionIdentity`], or none
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Account>);

impl CurrentUser {
    pub fn account(&self) -> Option<&Account> {
        self.0.as_ref()
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(CurrentUser(req.extensions().get::<Account>().cloned())))
    }
}
