use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime},
    options::ReturnDocument,
};

use crate::{
    database::MongoDB,
    models::feedback::{owned_filter, owner_filter, FeedbackRequest, FeedbackResponse},
    utils::error::AppError,
};

fn not_found() -> AppError {
    AppError::NotFound("Feedback not found".to_string())
}

pub async fn submit_feedback(
    db: &MongoDB,
    owner: &ObjectId,
    request: FeedbackRequest,
) -> Result<FeedbackResponse, AppError> {
    let mut feedback = request.into_feedback(*owner, BsonDateTime::now())?;

    let inserted = db.feedback().insert_one(&feedback).await?;
    feedback.id = inserted.inserted_id.as_object_id();

    log::info!("📝 Feedback for {} submitted by user {}", feedback.mentor_name, owner);
    Ok(FeedbackResponse::from(feedback))
}

/// Newest first.
pub async fn list_feedback(db: &MongoDB, owner: &ObjectId) -> Result<Vec<FeedbackResponse>, AppError> {
    let feedback = db
        .feedback()
        .find(owner_filter(owner))
        .sort(doc! { "createdAt": -1 })
        .await?
        .map_ok(FeedbackResponse::from)
        .try_collect()
        .await?;
    Ok(feedback)
}

pub async fn get_feedback(
    db: &MongoDB,
    owner: &ObjectId,
    id: &ObjectId,
) -> Result<FeedbackResponse, AppError> {
    db.feedback()
        .find_one(owned_filter(id, owner))
        .await?
        .map(FeedbackResponse::from)
        .ok_or_else(not_found)
}

pub async fn update_feedback(
    db: &MongoDB,
    owner: &ObjectId,
    id: &ObjectId,
    request: &FeedbackRequest,
) -> Result<FeedbackResponse, AppError> {
    let set = request.to_update()?;
    if set.is_empty() {
        // `$set` may not be empty; nothing to change means return the current state
        return get_feedback(db, owner, id).await;
    }

    db.feedback()
        .find_one_and_update(owned_filter(id, owner), doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .map(FeedbackResponse::from)
        .ok_or_else(not_found)
}

pub async fn delete_feedback(db: &MongoDB, owner: &ObjectId, id: &ObjectId) -> Result<(), AppError> {
    let result = db.feedback().delete_one(owned_filter(id, owner)).await?;
    if result.deleted_count == 0 {
        return Err(not_found());
    }
    Ok(())
}
