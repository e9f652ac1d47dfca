use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use crate::models::user::{parse_program, Program};
use crate::utils::{
    dates,
    error::AppError,
    validation::{lenient_int, Violations},
};

pub const FEEDBACK: &str = "feedback";

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const MAX_SUGGESTIONS_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    pub expertise: i32,
    pub communication: i32,
    pub supportiveness: i32,
    pub overall_satisfaction: i32,
}

/// Mentor feedback as stored in the `feedback` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub mentor_name: String,
    pub program: Program,
    pub ratings: Ratings,
    #[serde(default)]
    pub suggestions: String,
    #[serde(default)]
    pub is_anonymous: bool,
    pub created_at: BsonDateTime,
}

/// Feedback as returned to its author; the owner reference is left out.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub mentor_name: String,
    pub program: Program,
    pub ratings: Ratings,
    pub suggestions: String,
    pub is_anonymous: bool,
    pub created_at: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        FeedbackResponse {
            id: feedback.id.map(|id| id.to_hex()).unwrap_or_default(),
            mentor_name: feedback.mentor_name,
            program: feedback.program,
            ratings: feedback.ratings,
            suggestions: feedback.suggestions,
            is_anonymous: feedback.is_anonymous,
            created_at: dates::to_rfc3339(feedback.created_at),
        }
    }
}

/// Flat form payload; ratings may arrive as numbers or numeric strings.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub mentor_name: Option<String>,
    pub program: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub expertise: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub communication: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub supportiveness: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub overall_satisfaction: Option<i32>,
    pub suggestions: Option<String>,
    pub is_anonymous: Option<bool>,
}

impl FeedbackRequest {
    fn rating_fields(&self) -> [(&'static str, Option<i32>); 4] {
        [
            ("expertise", self.expertise),
            ("communication", self.communication),
            ("supportiveness", self.supportiveness),
            ("overallSatisfaction", self.overall_satisfaction),
        ]
    }

    fn checked_suggestions(&self, v: &mut Violations) -> Option<String> {
        self.suggestions.as_deref().map(|s| {
            let trimmed = s.trim();
            if trimmed.chars().count() > MAX_SUGGESTIONS_LEN {
                v.push(format!(
                    "Suggestions cannot exceed {} characters",
                    MAX_SUGGESTIONS_LEN
                ));
            }
            trimmed.to_string()
        })
    }

    /// Builds a new feedback document owned by `owner`.
    pub fn into_feedback(self, owner: ObjectId, now: BsonDateTime) -> Result<Feedback, AppError> {
        let mut v = Violations::new();

        let mentor_name = v.required_text(self.mentor_name.as_deref(), "Mentor name");
        let program = parse_program(&mut v, self.program.as_deref(), true);

        let mut values = [0i32; 4];
        for (slot, (name, rating)) in values.iter_mut().zip(self.rating_fields()) {
            match rating {
                Some(value) => {
                    check_rating(&mut v, name, value);
                    *slot = value;
                }
                None => v.push(format!("{} rating is required", name)),
            }
        }
        let suggestions = self.checked_suggestions(&mut v).unwrap_or_default();

        v.into_result()?;
        let program = program.ok_or_else(|| AppError::validation("Program is required"))?;
        let [expertise, communication, supportiveness, overall_satisfaction] = values;

        Ok(Feedback {
            id: None,
            student_id: owner,
            mentor_name,
            program,
            ratings: Ratings {
                expertise,
                communication,
                supportiveness,
                overall_satisfaction,
            },
            suggestions,
            is_anonymous: self.is_anonymous.unwrap_or(false),
            created_at: now,
        })
    }

    /// Validates supplied fields and builds the `$set` document; ratings merge per key.
    pub fn to_update(&self) -> Result<Document, AppError> {
        let mut v = Violations::new();
        let mut set = Document::new();

        if let Some(mentor_name) = v.present_text(self.mentor_name.as_deref(), "Mentor name") {
            set.insert("mentorName", mentor_name);
        }
        if self.program.is_some() {
            if let Some(program) = parse_program(&mut v, self.program.as_deref(), true) {
                set.insert("program", program.as_str());
            }
        }
        for (name, rating) in self.rating_fields() {
            if let Some(value) = rating {
                check_rating(&mut v, name, value);
                set.insert(format!("ratings.{}", name), value);
            }
        }
        if let Some(suggestions) = self.checked_suggestions(&mut v) {
            set.insert("suggestions", suggestions);
        }
        if let Some(is_anonymous) = self.is_anonymous {
            set.insert("isAnonymous", is_anonymous);
        }

        v.into_result()?;
        Ok(set)
    }
}

fn check_rating(v: &mut Violations, name: &str, value: i32) {
    v.range_i32(
        value,
        MIN_RATING,
        MAX_RATING,
        format!(
            "{} rating must be between {} and {}",
            name, MIN_RATING, MAX_RATING
        ),
    );
}

pub fn owned_filter(id: &ObjectId, owner: &ObjectId) -> Document {
    doc! { "_id": id, "studentId": owner }
}

pub fn owner_filter(owner: &ObjectId) -> Document {
    doc! { "studentId": owner }
}
