use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
};

use crate::{
    database::MongoDB,
    models::meeting::{
        owned_filter, upcoming_filter, CreateMeetingRequest, MeetingResponse,
        UpdateMeetingRequest,
    },
    utils::error::AppError,
};

fn not_found() -> AppError {
    AppError::NotFound("Meeting not found".to_string())
}

async fn find_sorted(db: &MongoDB, filter: Document) -> Result<Vec<MeetingResponse>, AppError> {
    let meetings = db
        .meetings()
        .find(filter)
        .sort(doc! { "scheduledDate": 1 })
        .await?
        .map_ok(MeetingResponse::from)
        .try_collect()
        .await?;
    Ok(meetings)
}

pub async fn list_meetings(db: &MongoDB, owner: &ObjectId) -> Result<Vec<MeetingResponse>, AppError> {
    find_sorted(db, doc! { "studentId": owner }).await
}

pub async fn list_upcoming(db: &MongoDB, owner: &ObjectId) -> Result<Vec<MeetingResponse>, AppError> {
    find_sorted(db, upcoming_filter(owner, Utc::now())).await
}

pub async fn create_meeting(
    db: &MongoDB,
    owner: &ObjectId,
    request: CreateMeetingRequest,
) -> Result<MeetingResponse, AppError> {
    let mut meeting = request.into_meeting(*owner, Utc::now())?;

    let inserted = db.meetings().insert_one(&meeting).await?;
    meeting.id = inserted.inserted_id.as_object_id();

    log::info!(
        "📅 Meeting {} scheduled with {} for user {}",
        meeting.id.map(|id| id.to_hex()).unwrap_or_default(),
        meeting.mentor_name,
        owner
    );
    Ok(MeetingResponse::from(meeting))
}

pub async fn get_meeting(
    db: &MongoDB,
    owner: &ObjectId,
    id: &ObjectId,
) -> Result<MeetingResponse, AppError> {
    db.meetings()
        .find_one(owned_filter(id, owner))
        .await?
        .map(MeetingResponse::from)
        .ok_or_else(not_found)
}

/// Applies a partial update; a meeting owned by someone else is reported as missing.
pub async fn update_meeting(
    db: &MongoDB,
    owner: &ObjectId,
    id: &ObjectId,
    request: &UpdateMeetingRequest,
) -> Result<MeetingResponse, AppError> {
    let mut set = request.to_update(Utc::now())?;

    let meetings = db.meetings();
    let current = meetings
        .find_one(owned_filter(id, owner))
        .await?
        .ok_or_else(not_found)?;
    request.mark_rescheduled(&mut set, &current);

    meetings
        .find_one_and_update(owned_filter(id, owner), doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .map(MeetingResponse::from)
        .ok_or_else(not_found)
}

pub async fn delete_meeting(db: &MongoDB, owner: &ObjectId, id: &ObjectId) -> Result<(), AppError> {
    let result = db.meetings().delete_one(owned_filter(id, owner)).await?;
    if result.deleted_count == 0 {
        return Err(not_found());
    }
    Ok(())
}
