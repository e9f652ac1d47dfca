use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer};

use crate::utils::error::AppError;

/// Collects every field problem of a payload so one response can list them all.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Trimmed value of a required text field, recording a violation when absent or blank.
    pub fn required_text(&mut self, value: Option<&str>, label: &str) -> String {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.to_string(),
            None => {
                self.push(format!("{} is required", label));
                String::new()
            }
        }
    }

    /// Same as `required_text` for fields that are optional on update but may not be blanked.
    pub fn present_text(&mut self, value: Option<&str>, label: &str) -> Option<String> {
        value.map(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                self.push(format!("{} cannot be empty", label));
            }
            trimmed.to_string()
        })
    }

    pub fn range_i32(&mut self, value: i32, min: i32, max: i32, message: impl Into<String>) {
        if value < min || value > max {
            self.push(message);
        }
    }

    pub fn range_f64(&mut self, value: f64, min: f64, max: f64, message: impl Into<String>) {
        if !value.is_finite() || value < min || value > max {
            self.push(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

/// Parses a path identifier; malformed values are a client error, not a miss.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::InvalidId)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `4`, `4.0` or `"4"` for integer form fields; anything else fails deserialization.
pub fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: Option<IntOrText> = Option::deserialize(deserializer)?;
    let value = match raw {
        None => return Ok(None),
        Some(IntOrText::Int(v)) => v,
        Some(IntOrText::Float(v)) if v.fract() == 0.0 && v.is_finite() => v as i64,
        Some(IntOrText::Float(v)) => {
            return Err(D::Error::custom(format!("expected a whole number, got {}", v)))
        }
        Some(IntOrText::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected a whole number, got \"{}\"", s)))?,
    };
    i32::try_from(value)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("number out of range: {}", value)))
}
