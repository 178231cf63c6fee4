// Data models for the job portal API

pub mod auth;
pub mod pagination;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, RegisterEmployerRequest, RegisterJobSeekerRequest};
pub use pagination::Pagination;
pub use user::{User, UserRole};
