pub mod clients;
pub mod models;
pub mod services;

pub use clients::HttpDetectorClient;
pub use services::HazardClassifier;
