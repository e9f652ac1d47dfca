pub mod auth;
pub mod feedback;
pub mod health;
pub mod meetings;
pub mod student;
pub mod swagger;

use actix_web::{web, HttpResponse};

use crate::{middleware::AuthMiddleware, utils::error::AppError};

/// Largest accepted JSON body.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Route table mounted under `base_path` (`/api` by default, `""` for unprefixed deployments).
pub fn configure(cfg: &mut web::ServiceConfig, base_path: &str) {
    cfg.service(
        web::scope(base_path)
            // Public
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .service(
                        web::resource("/verify")
                            .wrap(AuthMiddleware)
                            .route(web::get().to(auth::verify_token)),
                    ),
            )
            // Student: profile and derived views (JWT)
            .service(
                web::scope("/student")
                    .wrap(AuthMiddleware)
                    .route("/profile", web::get().to(student::get_profile))
                    .route("/profile", web::put().to(student::update_profile))
                    .route("/dashboard", web::get().to(student::get_dashboard))
                    .route("/progress", web::get().to(student::get_progress)),
            )
            // Meetings (JWT)
            .service(
                web::scope("/meetings")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(meetings::list_meetings))
                    .route("", web::post().to(meetings::create_meeting))
                    .route("/upcoming", web::get().to(meetings::list_upcoming))
                    .route("/{id}", web::get().to(meetings::get_meeting))
                    .route("/{id}", web::put().to(meetings::update_meeting))
                    .route("/{id}", web::delete().to(meetings::delete_meeting)),
            )
            // Feedback (JWT)
            .service(
                web::scope("/feedback")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(feedback::list_feedback))
                    .route("", web::post().to(feedback::submit_feedback))
                    .route("/{id}", web::get().to(feedback::get_feedback))
                    .route("/{id}", web::put().to(feedback::update_feedback))
                    .route("/{id}", web::delete().to(feedback::delete_feedback)),
            ),
    );
}

/// JSON extractor settings: body limit, and malformed bodies reported as validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, req| {
            log::warn!("⚠️  Rejected JSON body on {}: {}", req.path(), err);
            AppError::validation(err.to_string()).into()
        })
}

pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "message": "Route not found" }))
}
