pub mod feedback;
pub mod meeting;
pub mod user;
