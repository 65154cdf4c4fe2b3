//! 路由配置

use actix_web::web;

use super::auth::{index, login, logout, me, register};
use super::health::HealthService;
use super::helpers::{form_config, json_config, not_found};
use super::links::{create_link, delete_link, get_link, list_links, update_link};
use super::redirect::RedirectService;

/// 链接管理路由 `/urls`
///
/// 包含：
/// - GET /urls - 当前账号的链接
/// - POST /urls - 创建链接
/// - GET /urls/{code} - 获取单个链接及访问统计
/// - POST|PUT /urls/{code} - 更新目标地址
/// - POST /urls/{code}/delete, DELETE /urls/{code} - 删除链接
pub fn links_routes() -> actix_web::Scope {
    web::scope("/urls")
        .route("", web::get().to(list_links))
        .route("", web::post().to(create_link))
        .route("/{code}/delete", web::post().to(delete_link))
        .route("/{code}", web::get().to(get_link))
        .route("/{code}", web::post().to(update_link))
        .route("/{code}", web::put().to(update_link))
        .route("/{code}", web::delete().to(delete_link))
}

/// 账号路由
pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .route("/me", web::get().to(me));
}

/// 全部路由
///
/// 请求体解析失败和未匹配路由同样返回统一信封
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(form_config())
        .configure(auth_routes)
        .service(links_routes())
        .route(
            "/u/{code}",
            web::get().to(RedirectService::handle_redirect),
        )
        .route("/health", web::get().to(HealthService::health_check))
        .default_service(web::to(not_found));
}
