pub mod auth_handler;

pub use auth_handler::{
    __path_current_user, __path_login, __path_logout, __path_register, current_user, login,
    logout, register, AuthState,
};
