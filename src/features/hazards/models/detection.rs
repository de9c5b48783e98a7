use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pixel-space box corners, as emitted by the detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One detected object (Ultralytics JSON result shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub name: String,
    #[serde(rename = "class")]
    pub class_id: i64,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// How the label of a classification was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    /// Label taken from the first detection
    Detected,
    /// Model ran and found nothing
    NoDetections,
    /// Model could not be invoked or its output was unusable
    Failed(String),
}

/// Result of classifying one uploaded image
#[derive(Debug, Clone)]
pub struct Classification {
    pub label: String,
    pub outcome: ClassificationOutcome,
    pub detection_count: usize,
    /// Where the annotated rendering was written
    pub annotated_path: PathBuf,
}
