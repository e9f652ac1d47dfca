use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use crate::utils::{dates, error::AppError, validation::Violations};

pub const MEETINGS: &str = "meetings";

pub const MIN_DURATION: i32 = 15;
pub const MAX_DURATION: i32 = 180;
pub const DEFAULT_DURATION: i32 = 60;
pub const DEFAULT_LOCATION: &str = "Online";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
            MeetingStatus::Rescheduled => "rescheduled",
        }
    }

    pub fn parse(raw: &str) -> Option<MeetingStatus> {
        match raw.trim() {
            "scheduled" => Some(MeetingStatus::Scheduled),
            "completed" => Some(MeetingStatus::Completed),
            "cancelled" => Some(MeetingStatus::Cancelled),
            "rescheduled" => Some(MeetingStatus::Rescheduled),
            _ => None,
        }
    }

    /// Statuses that still count as "upcoming" when the date is in the future.
    pub fn pending() -> [&'static str; 2] {
        [
            MeetingStatus::Scheduled.as_str(),
            MeetingStatus::Rescheduled.as_str(),
        ]
    }
}

/// Mentoring meeting as stored in the `meetings` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Owning user.
    pub student_id: ObjectId,
    pub mentor_name: String,
    pub topic: String,
    pub scheduled_date: BsonDateTime,
    pub scheduled_time: String,
    pub duration: i32,
    pub status: MeetingStatus,
    pub location: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponse {
    pub id: String,
    pub student_id: String,
    pub mentor_name: String,
    pub topic: String,
    pub scheduled_date: String,
    pub scheduled_time: String,
    pub duration: i32,
    pub status: MeetingStatus,
    pub location: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Meeting> for MeetingResponse {
    fn from(meeting: Meeting) -> Self {
        MeetingResponse {
            id: meeting.id.map(|id| id.to_hex()).unwrap_or_default(),
            student_id: meeting.student_id.to_hex(),
            mentor_name: meeting.mentor_name,
            topic: meeting.topic,
            scheduled_date: dates::to_rfc3339(meeting.scheduled_date),
            scheduled_time: meeting.scheduled_time,
            duration: meeting.duration,
            status: meeting.status,
            location: meeting.location,
            notes: meeting.notes,
            created_at: dates::to_rfc3339(meeting.created_at),
            updated_at: dates::to_rfc3339(meeting.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    pub mentor_name: Option<String>,
    pub topic: Option<String>,
    /// RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD`.
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub duration: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl CreateMeetingRequest {
    /// Builds the document to insert; the owner always comes from the caller's identity.
    pub fn into_meeting(self, owner: ObjectId, now: DateTime<Utc>) -> Result<Meeting, AppError> {
        let mut v = Violations::new();

        let mentor_name = v.required_text(self.mentor_name.as_deref(), "Mentor name");
        let topic = v.required_text(self.topic.as_deref(), "Topic");
        let scheduled_time = v.required_text(self.scheduled_time.as_deref(), "Scheduled time");
        let scheduled_date = future_date(&mut v, self.scheduled_date.as_deref(), true, now);

        let duration = self.duration.unwrap_or(DEFAULT_DURATION);
        check_duration(&mut v, duration);

        v.into_result()?;
        let scheduled_date = scheduled_date
            .ok_or_else(|| AppError::validation("Scheduled date is required"))?;

        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();
        let now = dates::to_bson(now);

        Ok(Meeting {
            id: None,
            student_id: owner,
            mentor_name,
            topic,
            scheduled_date,
            scheduled_time,
            duration,
            status: MeetingStatus::Scheduled,
            location,
            notes: self.notes.map(|n| n.trim().to_string()).unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeetingRequest {
    pub mentor_name: Option<String>,
    pub topic: Option<String>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub duration: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
    /// `scheduled`, `completed`, `cancelled` or `rescheduled`.
    pub status: Option<String>,
}

impl UpdateMeetingRequest {
    /// Validates the supplied fields and builds the `$set` document.
    ///
    /// The reschedule rule needs the stored meeting; see [`UpdateMeetingRequest::mark_rescheduled`].
    pub fn to_update(&self, now: DateTime<Utc>) -> Result<Document, AppError> {
        let mut v = Violations::new();
        let mut set = Document::new();

        if let Some(mentor_name) = v.present_text(self.mentor_name.as_deref(), "Mentor name") {
            set.insert("mentorName", mentor_name);
        }
        if let Some(topic) = v.present_text(self.topic.as_deref(), "Topic") {
            set.insert("topic", topic);
        }
        if let Some(time) = v.present_text(self.scheduled_time.as_deref(), "Scheduled time") {
            set.insert("scheduledTime", time);
        }
        if let Some(date) = future_date(&mut v, self.scheduled_date.as_deref(), false, now) {
            set.insert("scheduledDate", date);
        }
        if let Some(duration) = self.duration {
            check_duration(&mut v, duration);
            set.insert("duration", duration);
        }
        if let Some(location) = &self.location {
            let location = location.trim();
            set.insert(
                "location",
                if location.is_empty() { DEFAULT_LOCATION } else { location },
            );
        }
        if let Some(notes) = &self.notes {
            set.insert("notes", notes.trim());
        }

        match self.status.as_deref() {
            Some(raw) => match MeetingStatus::parse(raw) {
                Some(status) => {
                    set.insert("status", status.as_str());
                }
                None => v.push(format!(
                    "Status must be one of scheduled, completed, cancelled, rescheduled (got '{}')",
                    raw
                )),
            },
            None => {}
        }

        v.into_result()?;
        set.insert("updatedAt", dates::to_bson(now));
        Ok(set)
    }

    /// Marks the meeting `rescheduled` when `set` moves its date or time away from
    /// `current` and the request named no status. Re-sending the stored values is not a move.
    pub fn mark_rescheduled(&self, set: &mut Document, current: &Meeting) {
        if self.status.is_some() {
            return;
        }
        let date_moved = set
            .get_datetime("scheduledDate")
            .map_or(false, |date| *date != current.scheduled_date);
        let time_moved = set
            .get_str("scheduledTime")
            .map_or(false, |time| time != current.scheduled_time);
        if date_moved || time_moved {
            set.insert("status", MeetingStatus::Rescheduled.as_str());
        }
    }
}

fn future_date(
    v: &mut Violations,
    raw: Option<&str>,
    required: bool,
    now: DateTime<Utc>,
) -> Option<BsonDateTime> {
    let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw,
        None => {
            if required || raw.is_some() {
                v.push("Scheduled date is required");
            }
            return None;
        }
    };
    match dates::parse_client_date(raw) {
        Some(date) if date > now => Some(dates::to_bson(date)),
        Some(_) => {
            v.push("Meeting must be scheduled for a future date");
            None
        }
        None => {
            v.push(format!("Scheduled date '{}' is not a valid date", raw));
            None
        }
    }
}

fn check_duration(v: &mut Violations, duration: i32) {
    v.range_i32(
        duration,
        MIN_DURATION,
        MAX_DURATION,
        format!(
            "Duration must be between {} and {} minutes",
            MIN_DURATION, MAX_DURATION
        ),
    );
}

/// Every meeting query is scoped to its owner.
pub fn owned_filter(id: &ObjectId, owner: &ObjectId) -> Document {
    doc! { "_id": id, "studentId": owner }
}

pub fn upcoming_filter(owner: &ObjectId, now: DateTime<Utc>) -> Document {
    doc! {
        "studentId": owner,
        "scheduledDate": { "$gte": dates::to_bson(now) },
        "status": { "$in": MeetingStatus::pending().to_vec() },
    }
}

pub fn completed_filter(owner: &ObjectId) -> Document {
    doc! { "studentId": owner, "status": MeetingStatus::Completed.as_str() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create(json: serde_json::Value, now: DateTime<Utc>) -> Result<Meeting, AppError> {
        serde_json::from_value::<CreateMeetingRequest>(json)
            .unwrap()
            .into_meeting(ObjectId::new(), now)
    }

    fn tomorrow(now: DateTime<Utc>) -> String {
        (now + Duration::days(1)).to_rfc3339()
    }

    fn errors<T: std::fmt::Debug>(result: Result<T, AppError>) -> Vec<String> {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_applies_defaults() {
        let now = Utc::now();
        let owner = ObjectId::new();
        let meeting = serde_json::from_value::<CreateMeetingRequest>(serde_json::json!({
            "mentorName": " Dr. Rao ",
            "topic": "Thesis",
            "scheduledDate": tomorrow(now),
            "scheduledTime": "10:00"
        }))
        .unwrap()
        .into_meeting(owner, now)
        .unwrap();

        assert_eq!(meeting.student_id, owner);
        assert_eq!(meeting.mentor_name, "Dr. Rao");
        assert_eq!(meeting.duration, DEFAULT_DURATION);
        assert_eq!(meeting.location, "Online");
        assert_eq!(meeting.notes, "");
        assert_eq!(meeting.status, MeetingStatus::Scheduled);
        assert!(meeting.id.is_none());
    }

    #[test]
    fn create_requires_future_date() {
        let now = Utc::now();
        let past = (now - Duration::minutes(1)).to_rfc3339();
        let errs = errors(create(
            serde_json::json!({
                "mentorName": "M", "topic": "T", "scheduledDate": past, "scheduledTime": "10:00"
            }),
            now,
        ));
        assert_eq!(errs, vec!["Meeting must be scheduled for a future date".to_string()]);

        let exactly_now = now.to_rfc3339();
        assert!(create(
            serde_json::json!({
                "mentorName": "M", "topic": "T", "scheduledDate": exactly_now, "scheduledTime": "10:00"
            }),
            now,
        )
        .is_err());
    }

    #[test]
    fn create_duration_boundaries() {
        let now = Utc::now();
        for (duration, ok) in [(14, false), (15, true), (180, true), (181, false)] {
            let result = create(
                serde_json::json!({
                    "mentorName": "M",
                    "topic": "T",
                    "scheduledDate": tomorrow(now),
                    "scheduledTime": "10:00",
                    "duration": duration
                }),
                now,
            );
            assert_eq!(result.is_ok(), ok, "duration {}", duration);
        }
    }

    #[test]
    fn create_lists_all_missing_fields() {
        let errs = errors(create(serde_json::json!({ "topic": "  " }), Utc::now()));
        assert_eq!(errs.len(), 4);
    }

    #[test]
    fn update_builds_partial_set() {
        let req: UpdateMeetingRequest =
            serde_json::from_value(serde_json::json!({ "status": "completed" })).unwrap();
        let set = req.to_update(Utc::now()).unwrap();
        assert_eq!(set.get_str("status").unwrap(), "completed");
        assert!(set.get("topic").is_none());
        assert!(set.get("scheduledDate").is_none());
        assert!(set.get("updatedAt").is_some());
    }

    fn stored(now: DateTime<Utc>, status: MeetingStatus) -> Meeting {
        let mut meeting = create(
            serde_json::json!({
                "mentorName": "M", "topic": "T", "scheduledDate": tomorrow(now), "scheduledTime": "10:00"
            }),
            now,
        )
        .unwrap();
        meeting.status = status;
        meeting
    }

    fn update_status(
        json: serde_json::Value,
        current: &Meeting,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let req: UpdateMeetingRequest = serde_json::from_value(json).unwrap();
        let mut set = req.to_update(now).unwrap();
        req.mark_rescheduled(&mut set, current);
        set.get_str("status").ok().map(str::to_string)
    }

    #[test]
    fn update_moving_date_or_time_marks_rescheduled() {
        let now = Utc::now();
        let current = stored(now, MeetingStatus::Scheduled);

        let later = (now + Duration::days(2)).to_rfc3339();
        assert_eq!(
            update_status(serde_json::json!({ "scheduledDate": later }), &current, now).as_deref(),
            Some("rescheduled")
        );
        assert_eq!(
            update_status(serde_json::json!({ "scheduledTime": "15:00" }), &current, now).as_deref(),
            Some("rescheduled")
        );
        assert_eq!(
            update_status(
                serde_json::json!({ "scheduledTime": "15:00", "status": "scheduled" }),
                &current,
                now
            )
            .as_deref(),
            Some("scheduled")
        );
    }

    #[test]
    fn resending_unchanged_time_keeps_status() {
        let now = Utc::now();
        let current = stored(now, MeetingStatus::Completed);

        let status = update_status(
            serde_json::json!({ "scheduledTime": " 10:00 ", "notes": "bring draft" }),
            &current,
            now,
        );
        assert_eq!(status, None);

        let same_date = dates::to_rfc3339(current.scheduled_date);
        let status = update_status(
            serde_json::json!({ "scheduledDate": same_date, "scheduledTime": "10:00" }),
            &current,
            now,
        );
        assert_eq!(status, None);
    }

    #[test]
    fn update_rejects_bad_values_without_partial_result() {
        let now = Utc::now();
        let req: UpdateMeetingRequest = serde_json::from_value(serde_json::json!({
            "topic": "Still valid",
            "duration": 14,
            "status": "postponed",
            "scheduledDate": (now - Duration::days(1)).to_rfc3339()
        }))
        .unwrap();
        assert_eq!(errors(req.to_update(now)).len(), 3);
    }

    #[test]
    fn update_blank_location_resets_to_online() {
        let req: UpdateMeetingRequest =
            serde_json::from_value(serde_json::json!({ "location": "  " })).unwrap();
        assert_eq!(req.to_update(Utc::now()).unwrap().get_str("location").unwrap(), "Online");
    }

    #[test]
    fn queries_are_owner_scoped() {
        let id = ObjectId::new();
        let owner = ObjectId::new();
        let filter = owned_filter(&id, &owner);
        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert_eq!(filter.get_object_id("studentId").unwrap(), owner);

        let upcoming = upcoming_filter(&owner, Utc::now());
        assert_eq!(upcoming.get_object_id("studentId").unwrap(), owner);
        let statuses = upcoming.get_document("status").unwrap().get_array("$in").unwrap();
        assert_eq!(statuses.len(), 2);
    }
}
