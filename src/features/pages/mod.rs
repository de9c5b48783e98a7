//! Server-rendered pages for browsers.

pub mod extractor;
pub mod flash;
pub mod handlers;
pub mod routes;

pub use handlers::PageState;
