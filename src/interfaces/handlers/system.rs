use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use humantime::format_duration;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::{repositories::account::AccountRepository, AppState};

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    storage_backend: String,
    storage: &'static str,
    uptime: String,
    start_at: String,
    timestamp: String,
    version: &'static str,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now();
    let uptime = now
        .signed_duration_since(*START_TIME)
        .to_std()
        .unwrap_or(Duration::ZERO);

    let storage = match state.auth_handler.account_repo.check_connection().await {
        Ok(()) => "OK",
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            "Unavailable"
        }
    };

    let response = HealthCheckResponse {
        status: if storage == "OK" { "healthy" } else { "degraded" },
        storage_backend: state.storage_backend.to_string(),
        storage,
        uptime: format_duration(Duration::from_secs(uptime.as_secs())).to_string(),
        start_at: START_TIME.to_rfc3339(),
        timestamp: now.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    };

    HttpResponse::Ok().json(response)
}
