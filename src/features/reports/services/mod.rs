pub mod geocoding_service;
mod report_service;
mod submission_service;

pub use geocoding_service::NominatimGeocoder;
pub use report_service::ReportService;
pub use submission_service::SubmissionService;
