use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::features::hazards::clients::HazardDetector;
use crate::features::hazards::models::{Classification, ClassificationOutcome, Detection};
use crate::features::hazards::services::annotation::{annotated_file_name, render_annotated};
use crate::shared::constants::UNKNOWN_HAZARD;

/// Hazard classifier adapter.
///
/// Label policy: the first detection's class name, otherwise `"Unknown Hazard"`.
/// An annotated artifact `detected_<filename>` is always written next to the
/// original, with boxes when the image can be decoded, else as a plain copy.
pub struct HazardClassifier {
    detector: Arc<dyn HazardDetector>,
}

impl HazardClassifier {
    pub fn new(detector: Arc<dyn HazardDetector>) -> Self {
        Self { detector }
    }

    pub async fn classify(&self, image_path: &Path) -> Classification {
        let (detections, outcome) = match self.detector.detect(image_path).await {
            Ok(detections) if detections.is_empty() => {
                (Vec::new(), ClassificationOutcome::NoDetections)
            }
            Ok(detections) => (detections, ClassificationOutcome::Detected),
            Err(e) => {
                tracing::warn!(
                    "Detector failed for {}: {}; using fallback label",
                    image_path.display(),
                    e
                );
                (Vec::new(), ClassificationOutcome::Failed(e.to_string()))
            }
        };

        let label = detections
            .first()
            .map(|d| d.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_HAZARD.to_string());

        let annotated_path = annotated_path_for(image_path);
        write_annotated(image_path, &annotated_path, detections.clone()).await;

        tracing::info!(
            "Classified {} as '{}' ({} detections, outcome: {:?})",
            image_path.display(),
            label,
            detections.len(),
            outcome
        );

        Classification {
            label,
            outcome,
            detection_count: detections.len(),
            annotated_path,
        }
    }
}

fn annotated_path_for(image_path: &Path) -> PathBuf {
    let file_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    image_path.with_file_name(annotated_file_name(&file_name))
}

async fn write_annotated(source: &Path, target: &Path, detections: Vec<Detection>) {
    let (src, dst) = (source.to_path_buf(), target.to_path_buf());
    let rendered =
        tokio::task::spawn_blocking(move || render_annotated(&src, &dst, &detections)).await;

    match rendered {
        Ok(Ok(())) => return,
        Ok(Err(e)) => tracing::warn!(
            "Could not render annotations for {}: {}; copying original",
            source.display(),
            e
        ),
        Err(e) => tracing::error!("Annotation task panicked: {}", e),
    }

    if let Err(e) = tokio::fs::copy(source, target).await {
        tracing::error!(
            "Failed to write annotated artifact {}: {}",
            target.display(),
            e
        );
    }
}
