use actix_web::{web, HttpResponse};

use crate::{
    database::MongoDB,
    middleware::AuthUser,
    models::user::{LoginRequest, RegisterRequest},
    services::{auth_service, token_service::TokenService},
    utils::error::{AppError, ErrorBody},
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = auth_service::AuthResponse),
        (status = 400, description = "Invalid payload or email/student ID already registered", body = ErrorBody)
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    tokens: web::Data<TokenService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.clone().unwrap_or_default();
    log::info!("📝 POST /auth/register - email: {}", email);

    match auth_service::register(&db, &tokens, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Created().json(response)),
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = auth_service::AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    tokens: web::Data<TokenService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.clone();
    log::info!("🔐 POST /auth/login - email: {}", email);

    match auth_service::login(&db, &tokens, request.into_inner()).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_token(user: web::ReqData<AuthUser>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "valid": true,
        "userId": user.id_hex()
    }))
}
