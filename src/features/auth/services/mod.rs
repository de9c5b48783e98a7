mod auth_service;
mod session_service;
mod token_service;

pub use auth_service::AuthService;
pub use session_service::SessionService;
