use actix_web::{web, HttpResponse};

use crate::{
    database::MongoDB,
    middleware::AuthUser,
    models::feedback::{FeedbackRequest, FeedbackResponse},
    services::feedback_service,
    utils::{
        error::{AppError, ErrorBody},
        validation::parse_object_id,
    },
};

#[utoipa::path(
    post,
    path = "/api/feedback",
    tag = "Feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback submitted", body = FeedbackResponse),
        (status = 400, description = "Missing or out-of-range rating", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_feedback(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
    request: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let feedback = feedback_service::submit_feedback(&db, &user.user_id, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Feedback submitted successfully",
        "feedback": feedback
    })))
}

#[utoipa::path(
    get,
    path = "/api/feedback",
    tag = "Feedback",
    responses((status = 200, description = "Feedback written by the caller, newest first", body = [FeedbackResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_feedback(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let feedbacks = feedback_service::list_feedback(&db, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "feedbacks": feedbacks })))
}

#[utoipa::path(
    get,
    path = "/api/feedback/{id}",
    tag = "Feedback",
    params(("id" = String, Path, description = "Feedback ObjectId")),
    responses(
        (status = 200, description = "Feedback", body = FeedbackResponse),
        (status = 404, description = "Not found or not owned by caller", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_feedback(
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let feedback = feedback_service::get_feedback(&db, &user.user_id, &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "feedback": feedback })))
}

#[utoipa::path(
    put,
    path = "/api/feedback/{id}",
    tag = "Feedback",
    params(("id" = String, Path, description = "Feedback ObjectId")),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback updated", body = FeedbackResponse),
        (status = 400, description = "Invalid field value", body = ErrorBody),
        (status = 404, description = "Not found or not owned by caller", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_feedback(
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🔧 PUT /feedback/{} - user {}", id, user.user_id);
    let feedback = feedback_service::update_feedback(&db, &user.user_id, &id, &request).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Feedback updated successfully",
        "feedback": feedback
    })))
}

#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    tag = "Feedback",
    params(("id" = String, Path, description = "Feedback ObjectId")),
    responses(
        (status = 200, description = "Feedback deleted"),
        (status = 404, description = "Not found or not owned by caller", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_feedback(
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🗑️  DELETE /feedback/{} - user {}", id, user.user_id);
    feedback_service::delete_feedback(&db, &user.user_id, &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Feedback deleted successfully" })))
}
