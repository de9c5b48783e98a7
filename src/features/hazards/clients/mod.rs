pub mod detector_client;

pub use detector_client::{HazardDetector, HttpDetectorClient};
