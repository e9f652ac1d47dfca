use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ReturnDocument,
};
use serde::Serialize;

use crate::{
    database::MongoDB,
    models::{
        feedback::{owner_filter, FeedbackResponse},
        meeting::{completed_filter, upcoming_filter, MeetingResponse},
        user::{id_filter, Skills, UpdateProfileRequest, User, UserProfile},
    },
    utils::error::AppError,
};

const DASHBOARD_UPCOMING_LIMIT: i64 = 5;
const DASHBOARD_RECENT_LIMIT: i64 = 5;
const DASHBOARD_FEEDBACK_LIMIT: i64 = 3;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    /// Completed meetings.
    pub recent_meetings: u64,
    pub upcoming_meetings: u64,
    pub feedback_count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub user: UserProfile,
    pub stats: ProfileStats,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: UserProfile,
    pub upcoming_meetings: Vec<MeetingResponse>,
    pub recent_meetings: Vec<MeetingResponse>,
    pub recent_feedback: Vec<FeedbackResponse>,
}

#[derive(Debug, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_meetings: u64,
    pub completed_meetings: u64,
    pub total_feedback: u64,
    pub progress_percentage: u32,
    pub attendance: f64,
    pub gpa: f64,
    pub skills: Skills,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProgressResponse {
    pub user: UserProfile,
    pub progress: Progress,
}

/// Share of meetings completed, rounded to a whole percent; zero when nothing is booked.
pub fn progress_percentage(completed: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

async fn load_user(db: &MongoDB, user_id: &ObjectId) -> Result<User, AppError> {
    db.users()
        .find_one(id_filter(user_id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn get_profile(db: &MongoDB, user_id: &ObjectId) -> Result<ProfileResponse, AppError> {
    let user = load_user(db, user_id).await?;

    let recent_meetings = db.meetings().count_documents(completed_filter(user_id)).await?;
    let upcoming_meetings = db
        .meetings()
        .count_documents(upcoming_filter(user_id, Utc::now()))
        .await?;
    let feedback_count = db.feedback().count_documents(owner_filter(user_id)).await?;

    Ok(ProfileResponse {
        user: UserProfile::from(user),
        stats: ProfileStats {
            recent_meetings,
            upcoming_meetings,
            feedback_count,
        },
    })
}

pub async fn update_profile(
    db: &MongoDB,
    user_id: &ObjectId,
    request: &UpdateProfileRequest,
) -> Result<UserProfile, AppError> {
    let set = request.to_update()?;

    db.users()
        .find_one_and_update(id_filter(user_id), doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn get_dashboard(
    db: &MongoDB,
    user_id: &ObjectId,
) -> Result<DashboardResponse, AppError> {
    let user = load_user(db, user_id).await?;

    let upcoming_meetings: Vec<MeetingResponse> = db
        .meetings()
        .find(upcoming_filter(user_id, Utc::now()))
        .sort(doc! { "scheduledDate": 1 })
        .limit(DASHBOARD_UPCOMING_LIMIT)
        .await?
        .map_ok(MeetingResponse::from)
        .try_collect()
        .await?;

    let recent_meetings: Vec<MeetingResponse> = db
        .meetings()
        .find(completed_filter(user_id))
        .sort(doc! { "scheduledDate": -1 })
        .limit(DASHBOARD_RECENT_LIMIT)
        .await?
        .map_ok(MeetingResponse::from)
        .try_collect()
        .await?;

    let recent_feedback: Vec<FeedbackResponse> = db
        .feedback()
        .find(owner_filter(user_id))
        .sort(doc! { "createdAt": -1 })
        .limit(DASHBOARD_FEEDBACK_LIMIT)
        .await?
        .map_ok(FeedbackResponse::from)
        .try_collect()
        .await?;

    Ok(DashboardResponse {
        user: UserProfile::from(user),
        upcoming_meetings,
        recent_meetings,
        recent_feedback,
    })
}

pub async fn get_progress(db: &MongoDB, user_id: &ObjectId) -> Result<ProgressResponse, AppError> {
    let user = load_user(db, user_id).await?;

    let total_meetings = db.meetings().count_documents(doc! { "studentId": user_id }).await?;
    let completed_meetings = db.meetings().count_documents(completed_filter(user_id)).await?;
    let total_feedback = db.feedback().count_documents(owner_filter(user_id)).await?;

    let progress = Progress {
        total_meetings,
        completed_meetings,
        total_feedback,
        progress_percentage: progress_percentage(completed_meetings, total_meetings),
        attendance: user.attendance,
        gpa: user.gpa,
        skills: user.skills.clone(),
    };

    Ok(ProgressResponse {
        user: UserProfile::from(user),
        progress,
    })
}
