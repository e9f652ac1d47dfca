use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation Error: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("Invalid ID format")]
    InvalidId,
    #[error("{0} already exists")]
    DuplicateKey(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }

    pub fn body(&self, expose_detail: bool) -> ErrorBody {
        match self {
            AppError::Validation(errors) => ErrorBody {
                message: "Validation Error".to_string(),
                errors: Some(errors.clone()),
                error: None,
            },
            AppError::Internal(detail) => ErrorBody {
                message: "Internal server error".to_string(),
                errors: None,
                error: expose_detail.then(|| detail.clone()),
            },
            other => ErrorBody {
                message: other.to_string(),
                errors: None,
                error: None,
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidId | AppError::DuplicateKey(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            log::error!("❌ Internal error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(self.body(crate::config::is_development()))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
            if write_error.code == DUPLICATE_KEY_CODE {
                let field = duplicate_key_field(&write_error.message)
                    .unwrap_or_else(|| "Value".to_string());
                return AppError::DuplicateKey(field);
            }
        }
        AppError::Internal(format!("Database error: {}", err))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::Internal(format!("Blocking task failed: {}", err))
    }
}

/// Pulls the offending field out of a server message such as
/// `E11000 duplicate key error collection: db.users index: email_1 dup key: { email: "a@x.com" }`.
pub fn duplicate_key_field(message: &str) -> Option<String> {
    if let Some((_, rest)) = message.split_once("dup key: {") {
        let field = rest.trim_start().split(':').next()?.trim();
        if !field.is_empty() {
            return Some(field.trim_matches('"').to_string());
        }
    }

    let (_, rest) = message.split_once("index: ")?;
    let index = rest.split_whitespace().next()?;
    index
        .rsplit_once('_')
        .map(|(field, _)| field.to_string())
        .filter(|field| !field.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_field_reads_dup_key_section() {
        let msg = r#"E11000 duplicate key error collection: mentoring.users index: email_1 dup key: { email: "a@x.com" }"#;
        assert_eq!(duplicate_key_field(msg).as_deref(), Some("email"));

        let msg = r#"E11000 duplicate key error collection: mentoring.users index: studentId_1 dup key: { studentId: "S1" }"#;
        assert_eq!(duplicate_key_field(msg).as_deref(), Some("studentId"));
    }

    #[test]
    fn duplicate_key_field_falls_back_to_index_name() {
        let msg = "E11000 duplicate key error collection: mentoring.users index: studentId_1";
        assert_eq!(duplicate_key_field(msg).as_deref(), Some("studentId"));
        assert_eq!(duplicate_key_field("something else"), None);
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AppError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::DuplicateKey("email".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("Invalid token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("Meeting not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_lists_validation_errors() {
        let err = AppError::Validation(vec!["a".into(), "b".into()]);
        let body = err.body(false);
        assert_eq!(body.message, "Validation Error");
        assert_eq!(body.errors, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn body_hides_internal_detail_outside_development() {
        let err = AppError::Internal("connection refused".into());
        assert_eq!(err.body(false).error, None);
        assert_eq!(err.body(true).error.as_deref(), Some("connection refused"));
        assert_eq!(err.body(false).message, "Internal server error");
    }

    #[test]
    fn duplicate_key_message_names_field() {
        let body = AppError::DuplicateKey("email".into()).body(false);
        assert_eq!(body.message, "email already exists");
    }
}
