use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use facematch_core::errors::AppError;
use facematch_core::images::ImageBuffer;
use facematch_core::runner::{run_comparison, run_detection, ComparisonConfig, DetectionConfig};
use facematch_core::service::{
    CompareFacesResponse, DetectFacesResponse, DetectedFace, FaceAnalysisService, FaceAttribute,
    FaceMatch, ServiceError, ServiceSettings, UnmatchedFace,
};
use tempfile::TempDir;

/// Answers detection by image contents so each fixture can carry its own
/// face count.
struct ScriptedService {
    faces_by_bytes: HashMap<Vec<u8>, usize>,
    compare: Result<CompareFacesResponse, ServiceError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    fn new(compare: Result<CompareFacesResponse, ServiceError>) -> Self {
        Self {
            faces_by_bytes: HashMap::new(),
            compare,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_faces(mut self, bytes: &[u8], faces: usize) -> Self {
        self.faces_by_bytes.insert(bytes.to_vec(), faces);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FaceAnalysisService for ScriptedService {
    async fn detect_faces(
        &self,
        image: &ImageBuffer,
        _attributes: &[FaceAttribute],
    ) -> Result<DetectFacesResponse, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("detect:{}", image.path().display()));
        let count = self
            .faces_by_bytes
            .get(image.bytes())
            .copied()
            .unwrap_or(0);
        Ok(DetectFacesResponse {
            faces: vec![DetectedFace; count],
        })
    }

    async fn compare_faces(
        &self,
        _source: &ImageBuffer,
        _target: &ImageBuffer,
        _similarity_threshold: f32,
    ) -> Result<CompareFacesResponse, ServiceError> {
        self.calls.lock().unwrap().push("compare".into());
        self.compare.clone()
    }
}

fn settings() -> ServiceSettings {
    ServiceSettings {
        region: None,
        profile: None,
        endpoint_url: None,
        call_timeout: Duration::from_secs(1),
    }
}

fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn config(source: PathBuf, target: PathBuf) -> ComparisonConfig {
    ComparisonConfig {
        source,
        target,
        similarity_threshold: 70.0,
        service: settings(),
    }
}

/// Collects progress lines in the order they were emitted.
#[derive(Default)]
struct Progress {
    lines: Vec<String>,
}

impl Progress {
    fn sink(&mut self) -> impl FnMut(&str) + '_ {
        move |line| self.lines.push(line.to_string())
    }
}

fn matched(similarity: f32) -> CompareFacesResponse {
    CompareFacesResponse {
        face_matches: vec![FaceMatch { similarity }],
        unmatched_faces: vec![],
    }
}

#[tokio::test]
async fn same_person_reports_similarity() {
    let tmp = TempDir::new().unwrap();
    let source = write_image(tmp.path(), "a.png", b"alice-1");
    let target = write_image(tmp.path(), "b.png", b"alice-2");
    let service = ScriptedService::new(Ok(matched(99.42)))
        .with_faces(b"alice-1", 1)
        .with_faces(b"alice-2", 2);

    let mut progress = Progress::default();

    let outcome = run_comparison(
        &config(source.clone(), target.clone()),
        &service,
        &mut progress.sink(),
    )
    .await
    .unwrap();

    assert!(outcome.summary.success);
    assert_eq!(outcome.summary.similarity, 99.42);
    assert!(outcome.summary.similarity >= outcome.summary.similarity_threshold);
    assert_eq!(outcome.summary.source_faces, 1);
    assert_eq!(outcome.summary.target_faces, 2);
    assert_eq!(
        progress.lines,
        vec![
            "Face detected Successfully!".to_string(),
            "Face detected Successfully!".to_string(),
            "Success!".to_string(),
        ]
    );
    assert_eq!(
        service.calls(),
        vec![
            format!("detect:{}", source.display()),
            format!("detect:{}", target.display()),
            "compare".to_string(),
        ]
    );
}

#[tokio::test]
async fn faceless_source_aborts_before_comparison() {
    let tmp = TempDir::new().unwrap();
    let source = write_image(tmp.path(), "a.png", b"landscape");
    let target = write_image(tmp.path(), "b.png", b"alice");
    let service = ScriptedService::new(Ok(matched(99.0))).with_faces(b"alice", 1);

    let mut progress = Progress::default();

    let err = run_comparison(&config(source.clone(), target), &service, &mut progress.sink())
        .await
        .unwrap_err();

    match err {
        AppError::NoFaceDetected { path } => assert_eq!(path, source),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.calls(), vec![format!("detect:{}", source.display())]);
    assert!(progress.lines.is_empty());
}

#[tokio::test]
async fn missing_target_fails_after_source_detection() {
    let tmp = TempDir::new().unwrap();
    let source = write_image(tmp.path(), "a.png", b"alice");
    let missing = tmp.path().join("b.png");
    let service = ScriptedService::new(Ok(matched(99.0))).with_faces(b"alice", 1);

    let mut progress = Progress::default();

    let err = run_comparison(&config(source, missing.clone()), &service, &mut progress.sink())
        .await
        .unwrap_err();

    match err {
        AppError::ImageRead { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!service.calls().contains(&"compare".to_string()));
    assert_eq!(progress.lines, vec!["Face detected Successfully!".to_string()]);
}

#[tokio::test]
async fn faceless_target_keeps_source_confirmation() {
    let tmp = TempDir::new().unwrap();
    let source = write_image(tmp.path(), "a.png", b"alice");
    let target = write_image(tmp.path(), "b.png", b"empty-room");
    let service = ScriptedService::new(Ok(matched(99.0))).with_faces(b"alice", 1);
    let mut progress = Progress::default();

    let err = run_comparison(&config(source, target.clone()), &service, &mut progress.sink())
        .await
        .unwrap_err();

    match err {
        AppError::NoFaceDetected { path } => assert_eq!(path, target),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(progress.lines, vec!["Face detected Successfully!".to_string()]);
}

#[tokio::test]
async fn unmatched_faces_fail_the_run() {
    let tmp = TempDir::new().unwrap();
    let source = write_image(tmp.path(), "a.png", b"alice");
    let target = write_image(tmp.path(), "b.png", b"bob");
    let service = ScriptedService::new(Ok(CompareFacesResponse {
        face_matches: vec![],
        unmatched_faces: vec![UnmatchedFace],
    }))
    .with_faces(b"alice", 1)
    .with_faces(b"bob", 1);

    let mut progress = Progress::default();

    let err = run_comparison(&config(source, target), &service, &mut progress.sink())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnmatchedFaces { count: 1 }));
    assert_eq!(
        progress.lines,
        vec![
            "Face detected Successfully!".to_string(),
            "Face detected Successfully!".to_string(),
            "Success!".to_string(),
        ]
    );
}

#[tokio::test]
async fn empty_comparison_reports_zero_similarity() {
    let tmp = TempDir::new().unwrap();
    let source = write_image(tmp.path(), "a.png", b"alice");
    let target = write_image(tmp.path(), "b.png", b"bob");
    let service = ScriptedService::new(Ok(CompareFacesResponse::default()))
        .with_faces(b"alice", 1)
        .with_faces(b"bob", 1);

    let outcome = run_comparison(&config(source, target), &service, &mut |_| {})
        .await
        .unwrap();
    assert_eq!(outcome.summary.similarity, 0.0);
}

#[tokio::test]
async fn out_of_range_threshold_makes_no_remote_calls() {
    let tmp = TempDir::new().unwrap();
    let source = write_image(tmp.path(), "a.png", b"alice");
    let target = write_image(tmp.path(), "b.png", b"alice");
    let service = ScriptedService::new(Ok(matched(99.0))).with_faces(b"alice", 1);

    let mut config = config(source, target);
    config.similarity_threshold = -1.0;

    let err = run_comparison(&config, &service, &mut |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidThreshold(_)));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn detection_reports_face_count() {
    let tmp = TempDir::new().unwrap();
    let image = write_image(tmp.path(), "group.png", b"group");
    let service = ScriptedService::new(Ok(CompareFacesResponse::default())).with_faces(b"group", 3);

    let mut progress = Progress::default();

    let outcome = run_detection(
        &DetectionConfig {
            image: image.clone(),
            service: settings(),
        },
        &service,
        &mut progress.sink(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.summary.num_faces, 3);
    assert_eq!(outcome.summary.image_path, image.display().to_string());
    assert_eq!(
        progress.lines,
        vec![
            format!("Loaded {} (5 bytes)", image.display()),
            "Face detected Successfully!".to_string(),
        ]
    );
}
