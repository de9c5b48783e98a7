pub mod models;
pub mod services;

pub use models::{User, UserRole};
pub use services::UserService;
