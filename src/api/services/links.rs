//! Owner-facing link endpoints under `/urls`

use actix_web::http::StatusCode;
use actix_web::web::{Either, Form, Json};
use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

use crate::api::middleware::CurrentUser;
use crate::services::LinkService;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_tinylink, json_response, payload};
use super::types::{DeleteResponse, LinkResponse, LinkTargetRequest};

/// `GET /urls`
pub async fn list_links(user: CurrentUser, links: web::Data<LinkService>) -> impl Responder {
    trace!("Received list links request");
    api_result(
        links
            .list_links(user.account())
            .map(|items| items.into_iter().map(LinkResponse::from).collect::<Vec<_>>()),
    )
}

/// `POST /urls`
pub async fn create_link(
    user: CurrentUser,
    links: web::Data<LinkService>,
    body: Option<Either<Json<LinkTargetRequest>, Form<LinkTargetRequest>>>,
) -> impl Responder {
    let req = payload(body);
    match links.create_link(user.account(), &req.target) {
        Ok(link) => json_response(
            StatusCode::CREATED,
            ErrorCode::Success,
            "Link created",
            Some(LinkResponse::from(link)),
        ),
        Err(e) => error_from_tinylink(&e),
    }
}

/// `GET /urls/{code}`
pub async fn get_link(
    user: CurrentUser,
    links: web::Data<LinkService>,
    path: web::Path<String>,
) -> impl Responder {
    let code = path.into_inner();
    api_result(links.view_link(user.account(), &code).map(LinkResponse::from))
}

/// `POST /urls/{code}`, `PUT /urls/{code}`
pub async fn update_link(
    user: CurrentUser,
    links: web::Data<LinkService>,
    path: web::Path<String>,
    body: Option<Either<Json<LinkTargetRequest>, Form<LinkTargetRequest>>>,
) -> impl Responder {
    let code = path.into_inner();
    let req = payload(body);
    api_result(
        links
            .update_link(user.account(), &code, &req.target)
            .map(LinkResponse::from),
    )
}

/// `POST /urls/{code}/delete`, `DELETE /urls/{code}`
pub async fn delete_link(
    user: CurrentUser,
    links: web::Data<LinkService>,
    path: web::Path<String>,
) -> HttpResponse {
    let code = path.into_inner();
    match links.delete_link(user.account(), &code) {
        Ok(()) => json_response(
            StatusCode::OK,
            ErrorCode::Success,
            "Link deleted",
            Some(DeleteResponse { code }),
        ),
        Err(e) => error_from_tinylink(&e),
    }
}
