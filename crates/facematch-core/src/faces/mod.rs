pub mod comparer;
pub mod detector;

pub use comparer::{
    compare_faces, evaluate_comparison, validate_threshold, ComparisonEvaluation,
    COMPARISON_CONFIRMATION,
};
pub use detector::{detect_face, DETECTION_CONFIRMATION};
