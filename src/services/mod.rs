pub mod auth_service;
pub mod feedback_service;
pub mod meeting_service;
pub mod student_service;
pub mod token_service;

pub use token_service::TokenService;
