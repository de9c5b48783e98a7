pub mod auth;
pub mod hazards;
pub mod pages;
pub mod reports;
pub mod users;
