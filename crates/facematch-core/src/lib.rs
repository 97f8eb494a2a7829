pub mod errors;
pub mod faces;
pub mod images;
pub mod runner;
pub mod service;

pub use errors::{AppError, AppResult};
pub use images::{load_image, ImageBuffer};
pub use runner::{
    run_comparison, run_comparison_blocking, run_detection, run_detection_blocking,
    ComparisonConfig, ComparisonOutcome, ComparisonSummary, DetectionConfig, DetectionOutcome,
    DetectionSummary,
};
pub use service::{FaceAnalysisService, RekognitionService, ServiceError, ServiceSettings};
