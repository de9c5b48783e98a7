pub mod page_handler;

pub use page_handler::{
    admin, dashboard, dashboard_submit, home, login_page, login_submit, logout, register_page,
    register_submit, resolve, PageState,
};
