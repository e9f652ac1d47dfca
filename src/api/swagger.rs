use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mentor Service API",
        version = "1.0.0",
        description = "API for the student mentoring platform.\n\n**Authentication:** every endpoint except health, register and login requires a JWT Bearer token.\n\n**Features:**\n- Student registration and login\n- Profile, dashboard and progress summaries\n- Mentoring meeting scheduling\n- Mentor feedback with 1-5 ratings",
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::verify_token,

        // Health
        crate::api::health::health_check,

        // Student
        crate::api::student::get_profile,
        crate::api::student::update_profile,
        crate::api::student::get_dashboard,
        crate::api::student::get_progress,

        // Meetings
        crate::api::meetings::list_meetings,
        crate::api::meetings::list_upcoming,
        crate::api::meetings::create_meeting,
        crate::api::meetings::get_meeting,
        crate::api::meetings::update_meeting,
        crate::api::meetings::delete_meeting,

        // Feedback
        crate::api::feedback::submit_feedback,
        crate::api::feedback::list_feedback,
        crate::api::feedback::get_feedback,
        crate::api::feedback::update_feedback,
        crate::api::feedback::delete_feedback,
    ),
    components(
        schemas(
            crate::utils::error::ErrorBody,
            crate::api::health::HealthResponse,

            crate::models::user::Program,
            crate::models::user::Skills,
            crate::models::user::UserProfile,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::UpdateProfileRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::student_service::ProfileStats,
            crate::services::student_service::ProfileResponse,
            crate::services::student_service::ProfileUpdateResponse,
            crate::services::student_service::DashboardResponse,
            crate::services::student_service::Progress,
            crate::services::student_service::ProgressResponse,

            crate::models::meeting::MeetingStatus,
            crate::models::meeting::MeetingResponse,
            crate::models::meeting::CreateMeetingRequest,
            crate::models::meeting::UpdateMeetingRequest,

            crate::models::feedback::Ratings,
            crate::models::feedback::FeedbackResponse,
            crate::models::feedback::FeedbackRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and token verification."),
        (name = "Health", description = "Liveness and database connectivity."),
        (name = "Student", description = "The caller's profile, dashboard and progress."),
        (name = "Meetings", description = "Mentoring meetings owned by the caller."),
        (name = "Feedback", description = "Mentor feedback written by the caller."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /auth/login or /auth/register"))
                        .build()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/verify",
            "/api/health",
            "/api/student/profile",
            "/api/student/dashboard",
            "/api/student/progress",
            "/api/meetings",
            "/api/meetings/upcoming",
            "/api/meetings/{id}",
            "/api/feedback",
            "/api/feedback/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
