use actix_web::http::header::{CACHE_CONTROL, LOCATION};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::{debug, error};

use crate::config::get_config;
use crate::errors::TinylinkError;
use crate::services::LinkService;
use crate::utils::ip::origin_of;

use super::helpers::error_from_tinylink;

pub struct RedirectService;

impl RedirectService {
    /// `GET /u/{code}`: public, counts one visit for the caller's origin
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        links: web::Data<LinkService>,
    ) -> impl Responder {
        let code = path.into_inner();
        let origin = origin_of(&req, &get_config().auth.trusted_proxies);

        match links.resolve_redirect(&code, &origin) {
            Ok(target) => {
                debug!("Redirecting '{}' for {} -> {}", code, origin, target);
                HttpResponse::Found()
                    .insert_header((LOCATION, target))
                    // 每次跳转都要计数，禁止缓存
                    .insert_header((CACHE_CONTROL, "no-store"))
                    .finish()
            }
            Err(e @ TinylinkError::NotFound(_)) => {
                debug!("Redirect code not found: {}", code);
                error_from_tinylink(&e)
            }
            Err(e) => {
                error!("Redirect failed for '{}': {}", code, e);
                error_from_tinylink(&e)
            }
        }
    }
}
