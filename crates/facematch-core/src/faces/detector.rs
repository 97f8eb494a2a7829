use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::images::ImageBuffer;
use crate::service::{FaceAnalysisService, FaceAttribute};

pub const DETECTION_CONFIRMATION: &str = "Face detected Successfully!";

/// Asks the service for faces in `image` and fails unless at least one is found.
/// On success [`DETECTION_CONFIRMATION`] is handed to `progress`.
///
/// The returned count is informational; callers treat detection as pass/fail.
pub async fn detect_face<S>(
    service: &S,
    image: &ImageBuffer,
    progress: &mut dyn FnMut(&str),
) -> AppResult<usize>
where
    S: FaceAnalysisService + ?Sized,
{
    debug!(path = %image.path().display(), bytes = image.len(), "detecting faces");
    let response = service
        .detect_faces(image, &[FaceAttribute::Default])
        .await
        .map_err(|source| AppError::RemoteService {
            context: "failed to detect faces",
            source,
        })?;

    if response.faces.is_empty() {
        return Err(AppError::NoFaceDetected {
            path: image.path().to_path_buf(),
        });
    }

    info!(
        path = %image.path().display(),
        faces = response.faces.len(),
        "faces detected"
    );
    progress(DETECTION_CONFIRMATION);
    Ok(response.faces.len())
}
