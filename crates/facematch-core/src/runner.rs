use std::path::PathBuf;

use serde::Serialize;
use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::faces::{compare_faces, detect_face, validate_threshold};
use crate::images::load_image;
use crate::service::{FaceAnalysisService, RekognitionService, ServiceSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    pub source: PathBuf,
    pub target: PathBuf,
    pub similarity_threshold: f32,
    pub service: ServiceSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub image: PathBuf,
    pub service: ServiceSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub success: bool,
    pub source_image: String,
    pub target_image: String,
    pub source_faces: usize,
    pub target_faces: usize,
    pub similarity_threshold: f32,
    pub similarity: f32,
}

#[derive(Debug)]
pub struct ComparisonOutcome {
    pub summary: ComparisonSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionSummary {
    pub success: bool,
    pub image_path: String,
    pub num_faces: usize,
}

#[derive(Debug)]
pub struct DetectionOutcome {
    pub summary: DetectionSummary,
}

/// Loads and checks both images, then compares them. The first failure ends
/// the run; nothing is retried.
///
/// Each step's confirmation line goes to `progress` as soon as the step
/// succeeds, so lines from earlier steps survive a later failure.
pub async fn run_comparison<S>(
    config: &ComparisonConfig,
    service: &S,
    progress: &mut dyn FnMut(&str),
) -> AppResult<ComparisonOutcome>
where
    S: FaceAnalysisService + ?Sized,
{
    let threshold = validate_threshold(config.similarity_threshold)?;

    let source = load_image(&config.source)?;
    let source_faces = detect_face(service, &source, progress).await?;

    let target = load_image(&config.target)?;
    let target_faces = detect_face(service, &target, progress).await?;

    let similarity = compare_faces(service, &source, &target, threshold, progress).await?;
    info!(similarity, "faces matched");

    let summary = ComparisonSummary {
        success: true,
        source_image: config.source.display().to_string(),
        target_image: config.target.display().to_string(),
        source_faces,
        target_faces,
        similarity_threshold: threshold,
        similarity,
    };

    Ok(ComparisonOutcome { summary })
}

pub async fn run_detection<S>(
    config: &DetectionConfig,
    service: &S,
    progress: &mut dyn FnMut(&str),
) -> AppResult<DetectionOutcome>
where
    S: FaceAnalysisService + ?Sized,
{
    let image = load_image(&config.image)?;
    progress(&format!(
        "Loaded {} ({} bytes)",
        config.image.display(),
        image.len()
    ));
    let num_faces = detect_face(service, &image, progress).await?;

    let summary = DetectionSummary {
        success: true,
        image_path: config.image.display().to_string(),
        num_faces,
    };

    Ok(DetectionOutcome { summary })
}

pub fn run_comparison_blocking(
    config: &ComparisonConfig,
    progress: &mut dyn FnMut(&str),
) -> AppResult<ComparisonOutcome> {
    let runtime = build_runtime()?;
    runtime.block_on(async {
        let service = RekognitionService::connect(&config.service).await;
        run_comparison(config, &service, progress).await
    })
}

pub fn run_detection_blocking(
    config: &DetectionConfig,
    progress: &mut dyn FnMut(&str),
) -> AppResult<DetectionOutcome> {
    let runtime = build_runtime()?;
    runtime.block_on(async {
        let service = RekognitionService::connect(&config.service).await;
        run_detection(config, &service, progress).await
    })
}

fn build_runtime() -> AppResult<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)
}
