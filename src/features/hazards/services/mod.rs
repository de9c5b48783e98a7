mod annotation;
mod classifier_service;

pub use classifier_service::HazardClassifier;
