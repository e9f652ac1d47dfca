use std::collections::BTreeMap;

use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use crate::utils::{dates, error::AppError, validation::Violations};

pub const USERS: &str = "users";

pub const MIN_PASSWORD_LEN: usize = 6;

/// Academic programs a student (and feedback) can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Program {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[serde(rename = "Information Technology")]
    InformationTechnology,
    #[serde(rename = "Civil Engineering")]
    CivilEngineering,
    #[serde(rename = "Mechanical Engineering")]
    MechanicalEngineering,
    #[serde(rename = "Electrical Engineering")]
    ElectricalEngineering,
    #[serde(rename = "Electronics & Communication")]
    ElectronicsAndCommunication,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Artificial Intelligence")]
    ArtificialIntelligence,
    #[serde(rename = "Biotechnology")]
    Biotechnology,
    #[serde(rename = "Physics")]
    Physics,
}

impl Program {
    pub const ALL: [Program; 10] = [
        Program::ComputerScience,
        Program::InformationTechnology,
        Program::CivilEngineering,
        Program::MechanicalEngineering,
        Program::ElectricalEngineering,
        Program::ElectronicsAndCommunication,
        Program::DataScience,
        Program::ArtificialIntelligence,
        Program::Biotechnology,
        Program::Physics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Program::ComputerScience => "Computer Science",
            Program::InformationTechnology => "Information Technology",
            Program::CivilEngineering => "Civil Engineering",
            Program::MechanicalEngineering => "Mechanical Engineering",
            Program::ElectricalEngineering => "Electrical Engineering",
            Program::ElectronicsAndCommunication => "Electronics & Communication",
            Program::DataScience => "Data Science",
            Program::ArtificialIntelligence => "Artificial Intelligence",
            Program::Biotechnology => "Biotechnology",
            Program::Physics => "Physics",
        }
    }

    pub fn parse(raw: &str) -> Option<Program> {
        let raw = raw.trim();
        Program::ALL.into_iter().find(|p| p.as_str() == raw)
    }
}

/// Parses a program name, recording a violation for unknown values.
pub fn parse_program(v: &mut Violations, raw: Option<&str>, required: bool) -> Option<Program> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => {
            let program = Program::parse(name);
            if program.is_none() {
                v.push(format!("Program '{}' is not a valid program", name));
            }
            program
        }
        None => {
            if required {
                v.push("Program is required");
            }
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    #[serde(default)]
    pub communication: i32,
    #[serde(default)]
    pub problem_solving: i32,
    #[serde(default)]
    pub teamwork: i32,
}

/// Student account as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    /// bcrypt hash; plaintext never reaches this field.
    pub password: String,
    pub name: String,
    pub program: Program,
    pub student_id: String,
    #[serde(default)]
    pub attendance: f64,
    #[serde(default)]
    pub gpa: f64,
    #[serde(default)]
    pub total_credits: i32,
    #[serde(default)]
    pub skills: Skills,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

/// User as returned to clients; the password hash is never included.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub program: Program,
    pub student_id: String,
    pub attendance: f64,
    pub gpa: f64,
    pub total_credits: i32,
    pub skills: Skills,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            name: user.name,
            program: user.program,
            student_id: user.student_id,
            attendance: user.attendance,
            gpa: user.gpa,
            total_credits: user.total_credits,
            skills: user.skills,
            created_at: dates::to_rfc3339(user.created_at),
            updated_at: dates::to_rfc3339(user.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub program: Option<String>,
    pub student_id: Option<String>,
}

/// Registration payload after validation; `password` is still plaintext here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub program: Program,
    pub student_id: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<NewUser, AppError> {
        let mut v = Violations::new();

        let email = v.required_text(self.email.as_deref(), "Email").to_lowercase();
        if !email.is_empty() && !looks_like_email(&email) {
            v.push("Email must be a valid email address");
        }

        let password = self.password.clone().unwrap_or_default();
        if password.is_empty() {
            v.push("Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            v.push(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }

        let name = v.required_text(self.name.as_deref(), "Name");
        let program = parse_program(&mut v, self.program.as_deref(), true);
        let student_id = v.required_text(self.student_id.as_deref(), "Student ID");

        v.into_result()?;
        let program = program.ok_or_else(|| AppError::validation("Program is required"))?;
        Ok(NewUser {
            email,
            password,
            name,
            program,
            student_id,
        })
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub program: Option<String>,
    pub attendance: Option<f64>,
    pub gpa: Option<f64>,
    pub total_credits: Option<i32>,
    /// Keys: `communication`, `problemSolving`, `teamwork`.
    pub skills: Option<BTreeMap<String, i32>>,
}

impl UpdateProfileRequest {
    /// Validates every supplied field and builds the `$set` document.
    ///
    /// Only present fields are written; skills are merged key by key.
    pub fn to_update(&self) -> Result<Document, AppError> {
        let mut v = Violations::new();
        let mut set = Document::new();

        if let Some(name) = v.present_text(self.name.as_deref(), "Name") {
            set.insert("name", name);
        }
        if self.program.is_some() {
            if let Some(program) = parse_program(&mut v, self.program.as_deref(), true) {
                set.insert("program", program.as_str());
            }
        }
        if let Some(attendance) = self.attendance {
            v.range_f64(attendance, 0.0, 100.0, "Attendance must be between 0 and 100");
            set.insert("attendance", attendance);
        }
        if let Some(gpa) = self.gpa {
            v.range_f64(gpa, 0.0, 4.0, "GPA must be between 0 and 4.0");
            set.insert("gpa", gpa);
        }
        if let Some(credits) = self.total_credits {
            if credits < 0 {
                v.push("Total credits cannot be negative");
            }
            set.insert("totalCredits", credits);
        }
        if let Some(skills) = &self.skills {
            for (key, value) in skills {
                match key.as_str() {
                    "communication" | "problemSolving" | "teamwork" => {
                        v.range_i32(
                            *value,
                            0,
                            100,
                            format!("{} skill rating must be between 0 and 100", key),
                        );
                        set.insert(format!("skills.{}", key), *value);
                    }
                    other => v.push(format!("Invalid skill: {}", other)),
                }
            }
        }

        v.into_result()?;
        set.insert("updatedAt", BsonDateTime::now());
        Ok(set)
    }
}

pub fn id_filter(user_id: &ObjectId) -> Document {
    doc! { "_id": user_id }
}
