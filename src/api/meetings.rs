use actix_web::{web, HttpResponse};

use crate::{
    database::MongoDB,
    middleware::AuthUser,
    models::meeting::{CreateMeetingRequest, MeetingResponse, UpdateMeetingRequest},
    services::meeting_service,
    utils::{
        error::{AppError, ErrorBody},
        validation::parse_object_id,
    },
};

#[utoipa::path(
    get,
    path = "/api/meetings",
    tag = "Meetings",
    responses((status = 200, description = "All meetings of the caller, soonest first", body = [MeetingResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_meetings(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let meetings = meeting_service::list_meetings(&db, &user.user_id).await?;
    log::info!("📋 GET /meetings - {} meetings for user {}", meetings.len(), user.user_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "meetings": meetings })))
}

#[utoipa::path(
    get,
    path = "/api/meetings/upcoming",
    tag = "Meetings",
    responses((status = 200, description = "Future meetings still scheduled or rescheduled", body = [MeetingResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_upcoming(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let meetings = meeting_service::list_upcoming(&db, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "meetings": meetings })))
}

#[utoipa::path(
    post,
    path = "/api/meetings",
    tag = "Meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting scheduled", body = MeetingResponse),
        (status = 400, description = "Missing field, past date or duration out of range", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_meeting(
    user: web::ReqData<AuthUser>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateMeetingRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /meetings - user {}", user.user_id);
    let meeting = meeting_service::create_meeting(&db, &user.user_id, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Meeting created successfully",
        "meeting": meeting
    })))
}

#[utoipa::path(
    get,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = String, Path, description = "Meeting ObjectId")),
    responses(
        (status = 200, description = "Meeting", body = MeetingResponse),
        (status = 404, description = "Not found or not owned by caller", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_meeting(
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let meeting = meeting_service::get_meeting(&db, &user.user_id, &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "meeting": meeting })))
}

#[utoipa::path(
    put,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = String, Path, description = "Meeting ObjectId")),
    request_body = UpdateMeetingRequest,
    responses(
        (status = 200, description = "Meeting updated", body = MeetingResponse),
        (status = 400, description = "Invalid field value", body = ErrorBody),
        (status = 404, description = "Not found or not owned by caller", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_meeting(
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateMeetingRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🔧 PUT /meetings/{} - user {}", id, user.user_id);
    let meeting = meeting_service::update_meeting(&db, &user.user_id, &id, &request).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Meeting updated successfully",
        "meeting": meeting
    })))
}

#[utoipa::path(
    delete,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = String, Path, description = "Meeting ObjectId")),
    responses(
        (status = 200, description = "Meeting deleted"),
        (status = 404, description = "Not found or not owned by caller", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_meeting(
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🗑️  DELETE /meetings/{} - user {}", id, user.user_id);
    meeting_service::delete_meeting(&db, &user.user_id, &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Meeting deleted successfully" })))
}
