mod detection;

pub use detection::{BoundingBox, Classification, ClassificationOutcome, Detection};
