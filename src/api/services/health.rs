use actix_web::{Responder, web};
use std::time::Instant;
use tracing::trace;

use crate::services::{AuthService, LinkService};

use super::helpers::success_response;
use super::types::HealthResponse;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        links: web::Data<LinkService>,
        auth: web::Data<AuthService>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let response = HealthResponse {
            status: "healthy".to_string(),
            started_at: app_start_time.start_datetime.to_rfc3339(),
            uptime,
            links_count: links.registry().len(),
            accounts_count: auth.identities().len(),
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        success_response(response)
    }
}
