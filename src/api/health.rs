use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::database::MongoDB;

/// Moment the server started, registered as app data for uptime reporting.
#[derive(Debug, Clone, Copy)]
pub struct StartedAt(pub Instant);

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    /// Seconds since startup.
    pub uptime: f64,
    /// `Connected` or `Disconnected`.
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up; database reports store connectivity", body = HealthResponse)
    )
)]
pub async fn health_check(db: web::Data<MongoDB>, started: web::Data<StartedAt>) -> HttpResponse {
    let database = if db.is_connected().await {
        "Connected"
    } else {
        "Disconnected"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        service: "mentor-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: started.0.elapsed().as_secs_f64(),
        database: database.to_string(),
    })
}
