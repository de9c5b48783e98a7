use std::sync::Arc;

use crate::core::error::Result;
use crate::features::hazards::HazardClassifier;
use crate::features::reports::models::{NewReport, Report};
use crate::features::reports::services::geocoding_service::{resolve_location, ReverseGeocoder};
use crate::features::reports::services::ReportService;
use crate::modules::storage::UploadStore;

/// Report submission pipeline: store the photo, classify it, geocode the
/// coordinates, route to the city's official and persist.
///
/// Detector and geocoder failures degrade to fallback values; only storage
/// and database errors fail a submission.
pub struct SubmissionService {
    uploads: Arc<UploadStore>,
    classifier: Arc<HazardClassifier>,
    geocoder: Arc<dyn ReverseGeocoder>,
    reports: Arc<ReportService>,
}

impl SubmissionService {
    pub fn new(
        uploads: Arc<UploadStore>,
        classifier: Arc<HazardClassifier>,
        geocoder: Arc<dyn ReverseGeocoder>,
        reports: Arc<ReportService>,
    ) -> Self {
        Self {
            uploads,
            classifier,
            geocoder,
            reports,
        }
    }

    pub async fn submit(
        &self,
        user_id: i64,
        file_name: &str,
        data: &[u8],
        lat: &str,
        lon: &str,
    ) -> Result<Report> {
        let stored = self.uploads.save(file_name, data).await?;

        let classification = self.classifier.classify(&stored.disk_path).await;
        let location = resolve_location(self.geocoder.as_ref(), lat, lon).await;

        tracing::debug!(
            "Submission '{}': {} detections ({:?})",
            file_name,
            classification.detection_count,
            classification.outcome
        );

        let annotated_name = classification
            .annotated_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let new_report = NewReport {
            user_id,
            image_path: stored.public_path,
            annotated_path: UploadStore::public_path(&annotated_name),
            hazard_type: classification.label,
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            assigned_to: location.assigned_to(),
            address: location.address,
        };

        self.reports.create(&new_report).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportStatus;
    use crate::shared::test_helpers::{test_pool, test_png_bytes, StubDetector, StubGeocoder};

    async fn service_with(
        dir: &std::path::Path,
        detector: StubDetector,
        geocoder: StubGeocoder,
    ) -> (SubmissionService, Arc<ReportService>) {
        let reports = Arc::new(ReportService::new(test_pool().await));
        let service = SubmissionService::new(
            Arc::new(UploadStore::new(dir.join("uploads"))),
            Arc::new(HazardClassifier::new(Arc::new(detector))),
            Arc::new(geocoder),
            reports.clone(),
        );
        (service, reports)
    }

    #[tokio::test]
    async fn test_submit_routes_to_city_official() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service_with(
            dir.path(),
            StubDetector::labels(&["pothole"]),
            StubGeocoder::returning("Anna Salai, Chennai, Tamil Nadu, India", "Chennai"),
        )
        .await;

        let report = service
            .submit(7, "road.png", &test_png_bytes(), "13.0827", "80.2707")
            .await
            .unwrap();

        assert_eq!(report.user_id, 7);
        assert_eq!(report.hazard_type, "pothole");
        assert_eq!(report.assigned_to, "Chennai Mayor");
        assert_eq!(report.address, "Anna Salai, Chennai, Tamil Nadu, India");
        assert_eq!(report.image_path, "static/uploads/road.png");
        assert_eq!(report.annotated_path, "static/uploads/detected_road.png");
        assert_eq!(report.latitude, "13.0827");
        assert_eq!(report.status, ReportStatus::Pending);
        assert!(dir.path().join("uploads/road.png").exists());
        assert!(dir.path().join("uploads/detected_road.png").exists());
    }

    #[tokio::test]
    async fn test_submit_survives_detector_and_geocoder_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (service, reports) = service_with(
            dir.path(),
            StubDetector::failing(),
            StubGeocoder::failing(),
        )
        .await;

        let report = service
            .submit(1, "x.png", &test_png_bytes(), "0", "0")
            .await
            .unwrap();

        assert_eq!(report.hazard_type, "Unknown Hazard");
        assert_eq!(report.address, "GPS Location Found (Address Unavailable)");
        assert_eq!(report.assigned_to, "General Mayor");
        assert_eq!(reports.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_path_traversal_without_storing() {
        let dir = tempfile::tempdir().unwrap();
        let (service, reports) = service_with(
            dir.path(),
            StubDetector::labels(&["pothole"]),
            StubGeocoder::failing(),
        )
        .await;

        let result = service
            .submit(1, "../escape.png", &test_png_bytes(), "0", "0")
            .await;

        assert!(result.is_err());
        assert_eq!(reports.count().await.unwrap(), 0);
    }
}
