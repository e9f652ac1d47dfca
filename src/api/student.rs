use actix_web::{web, HttpResponse};

use crate::{
    database::MongoDB,
    middleware::AuthUser,
    models::user::UpdateProfileRequest,
    services::student_service,
    utils::error::{AppError, ErrorBody},
};

#[utoipa::path(
    get,
    path = "/api/student/profile",
    tag = "Student",
    responses(
        (status = 200, description = "Profile with meeting and feedback counts", body = student_service::ProfileResponse),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /student/profile - user {}", user.user_id);
    let profile = student_service::get_profile(&db, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    put,
    path = "/api/student/profile",
    tag = "Student",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = student_service::ProfileUpdateResponse),
        (status = 400, description = "Out-of-range or unknown field", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PUT /student/profile - user {}", user.user_id);
    let updated = student_service::update_profile(&db, &user.user_id, &request).await?;
    Ok(HttpResponse::Ok().json(student_service::ProfileUpdateResponse {
        message: "Profile updated successfully".to_string(),
        user: updated,
    }))
}

#[utoipa::path(
    get,
    path = "/api/student/dashboard",
    tag = "Student",
    responses(
        (status = 200, description = "Upcoming and recent activity", body = student_service::DashboardResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    log::info!("📊 GET /student/dashboard - user {}", user.user_id);
    let dashboard = student_service::get_dashboard(&db, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

#[utoipa::path(
    get,
    path = "/api/student/progress",
    tag = "Student",
    responses(
        (status = 200, description = "Meeting completion and academic progress", body = student_service::ProgressResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_progress(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    log::info!("📈 GET /student/progress - user {}", user.user_id);
    let progress = student_service::get_progress(&db, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(progress))
}
