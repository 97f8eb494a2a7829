use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult};
use crate::images::ImageBuffer;
use crate::service::{CompareFacesResponse, FaceAnalysisService};

pub const COMPARISON_CONFIRMATION: &str = "Success!";

#[derive(Debug)]
pub struct ComparisonEvaluation {
    pub similarity: f32,
    pub error: Option<AppError>,
}

impl ComparisonEvaluation {
    pub fn into_result(self) -> AppResult<f32> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.similarity),
        }
    }
}

pub fn validate_threshold(threshold: f32) -> AppResult<f32> {
    if (0.0..=100.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(AppError::InvalidThreshold(threshold))
    }
}

/// Folds a (possibly partial) comparison response and any recorded call error
/// into a similarity score.
///
/// Unmatched faces replace a recorded call error, and any match overrides
/// both: the first match's similarity is returned with no error. Without a
/// match the score is `0.0` alongside whatever error was recorded.
pub fn evaluate_comparison(
    response: &CompareFacesResponse,
    call_error: Option<AppError>,
) -> ComparisonEvaluation {
    let mut error = call_error;

    if !response.unmatched_faces.is_empty() {
        error = Some(AppError::UnmatchedFaces {
            count: response.unmatched_faces.len(),
        });
    }

    if let Some(first) = response.face_matches.first() {
        return ComparisonEvaluation {
            similarity: first.similarity,
            error: None,
        };
    }

    ComparisonEvaluation {
        similarity: 0.0,
        error,
    }
}

/// Runs the remote comparison and evaluates it. [`COMPARISON_CONFIRMATION`]
/// is handed to `progress` once the call returns, whether or not it failed.
pub async fn compare_faces<S>(
    service: &S,
    source: &ImageBuffer,
    target: &ImageBuffer,
    similarity_threshold: f32,
    progress: &mut dyn FnMut(&str),
) -> AppResult<f32>
where
    S: FaceAnalysisService + ?Sized,
{
    let threshold = validate_threshold(similarity_threshold)?;
    debug!(
        source = %source.path().display(),
        target = %target.path().display(),
        threshold,
        "comparing faces"
    );

    // A failed call is recorded rather than returned so a match can still win.
    let (response, call_error) = match service.compare_faces(source, target, threshold).await {
        Ok(response) => (response, None),
        Err(err) => {
            warn!(error = %err, "face comparison call failed");
            (
                CompareFacesResponse::default(),
                Some(AppError::RemoteService {
                    context: "error comparing faces",
                    source: err,
                }),
            )
        }
    };
    info!(
        matches = response.face_matches.len(),
        unmatched = response.unmatched_faces.len(),
        "face comparison returned"
    );
    progress(COMPARISON_CONFIRMATION);

    evaluate_comparison(&response, call_error).into_result()
}
