use actix_web::web;
use mongodb::bson::{doc, DateTime as BsonDateTime};
use serde::Serialize;

use crate::{
    database::MongoDB,
    models::user::{LoginRequest, RegisterRequest, User, UserProfile},
    services::token_service::TokenService,
    utils::{
        crypto::{hash_password, verify_password},
        error::AppError,
    },
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

// User registration
pub async fn register(
    db: &MongoDB,
    tokens: &TokenService,
    request: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let new_user = request.validate()?;
    let users = db.users();

    // Friendlier message than the unique index; the index still guards races
    let existing = users
        .find_one(doc! {
            "$or": [
                { "email": &new_user.email },
                { "studentId": &new_user.student_id },
            ]
        })
        .await?;
    if let Some(existing) = existing {
        let field = if existing.email == new_user.email {
            "email"
        } else {
            "studentId"
        };
        return Err(AppError::DuplicateKey(field.to_string()));
    }

    let plain = new_user.password.clone();
    let password = web::block(move || hash_password(&plain)).await??;

    let now = BsonDateTime::now();
    let mut user = User {
        id: None,
        email: new_user.email,
        password,
        name: new_user.name,
        program: new_user.program,
        student_id: new_user.student_id,
        attendance: 0.0,
        gpa: 0.0,
        total_credits: 0,
        skills: Default::default(),
        created_at: now,
        updated_at: now,
    };

    let inserted = users.insert_one(&user).await?;
    let user_id = inserted
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::Internal("Inserted user has no ObjectId".to_string()))?;
    user.id = Some(user_id);

    let token = tokens.issue(&user_id.to_hex())?;
    log::info!("✅ User registered: {} ({})", user.email, user_id);

    Ok(AuthResponse {
        message: "User registered successfully".to_string(),
        token,
        user: UserProfile::from(user),
    })
}

// User login
pub async fn login(
    db: &MongoDB,
    tokens: &TokenService,
    request: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let email = request.normalized_email();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let user = db
        .users()
        .find_one(doc! { "email": &email })
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let stored = user.password.clone();
    let candidate = request.password;
    let valid = web::block(move || verify_password(&candidate, &stored)).await?;
    if !valid {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal("Stored user has no ObjectId".to_string()))?;
    let token = tokens.issue(&user_id.to_hex())?;

    Ok(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: UserProfile::from(user),
    })
}
