use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, Image};
use aws_sdk_rekognition::Client;
use facematch_config::ResolvedConfig;
use thiserror::Error;
use tracing::debug;

use crate::images::ImageBuffer;

pub const DETECT_FACES: &str = "DetectFaces";
pub const COMPARE_FACES: &str = "CompareFaces";

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{operation} failed: {message}")]
pub struct ServiceError {
    operation: String,
    message: String,
}

impl ServiceError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Facial attribute set requested from detection. Only the service's
/// default set is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceAttribute {
    Default,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectedFace;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectFacesResponse {
    pub faces: Vec<DetectedFace>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    pub similarity: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnmatchedFace;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompareFacesResponse {
    pub face_matches: Vec<FaceMatch>,
    pub unmatched_faces: Vec<UnmatchedFace>,
}

/// Remote face analysis backend.
#[async_trait]
pub trait FaceAnalysisService: Send + Sync {
    async fn detect_faces(
        &self,
        image: &ImageBuffer,
        attributes: &[FaceAttribute],
    ) -> Result<DetectFacesResponse, ServiceError>;

    async fn compare_faces(
        &self,
        source: &ImageBuffer,
        target: &ImageBuffer,
        similarity_threshold: f32,
    ) -> Result<CompareFacesResponse, ServiceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub call_timeout: Duration,
}

impl From<&ResolvedConfig> for ServiceSettings {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            region: config.region.clone(),
            profile: config.profile.clone(),
            endpoint_url: config.endpoint_url.clone(),
            call_timeout: config.call_timeout,
        }
    }
}

/// AWS Rekognition backed implementation. Credentials and region come from
/// the default provider chain unless overridden in [`ServiceSettings`].
pub struct RekognitionService {
    client: Client,
    call_timeout: Duration,
}

impl RekognitionService {
    pub async fn connect(settings: &ServiceSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        debug!(
            region = ?sdk_config.region().map(|region| region.to_string()),
            timeout_secs = settings.call_timeout.as_secs(),
            "rekognition client configured"
        );

        Self {
            client: Client::new(&sdk_config),
            call_timeout: settings.call_timeout,
        }
    }

    async fn with_timeout<T, F>(&self, operation: &str, call: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::new(
                operation,
                format!("timed out after {}s", self.call_timeout.as_secs()),
            )),
        }
    }
}

fn sdk_image(image: &ImageBuffer) -> Image {
    Image::builder()
        .bytes(Blob::new(image.bytes().to_vec()))
        .build()
}

fn sdk_attribute(attribute: FaceAttribute) -> Attribute {
    match attribute {
        FaceAttribute::Default => Attribute::Default,
    }
}

#[async_trait]
impl FaceAnalysisService for RekognitionService {
    async fn detect_faces(
        &self,
        image: &ImageBuffer,
        attributes: &[FaceAttribute],
    ) -> Result<DetectFacesResponse, ServiceError> {
        let attributes = attributes.iter().copied().map(sdk_attribute).collect();
        let request = self
            .client
            .detect_faces()
            .image(sdk_image(image))
            .set_attributes(Some(attributes));

        let call = async move {
            let output = request.send().await.map_err(|err| {
                ServiceError::new(DETECT_FACES, DisplayErrorContext(&err).to_string())
            })?;
            let faces = vec![DetectedFace; output.face_details().len()];
            Ok::<_, ServiceError>(DetectFacesResponse { faces })
        };
        self.with_timeout(DETECT_FACES, call).await
    }

    async fn compare_faces(
        &self,
        source: &ImageBuffer,
        target: &ImageBuffer,
        similarity_threshold: f32,
    ) -> Result<CompareFacesResponse, ServiceError> {
        let request = self
            .client
            .compare_faces()
            .source_image(sdk_image(source))
            .target_image(sdk_image(target))
            .similarity_threshold(similarity_threshold);

        let call = async move {
            let output = request.send().await.map_err(|err| {
                ServiceError::new(COMPARE_FACES, DisplayErrorContext(&err).to_string())
            })?;
            let face_matches = output
                .face_matches()
                .iter()
                .map(|found| FaceMatch {
                    similarity: found.similarity().unwrap_or_default(),
                })
                .collect();
            let unmatched_faces = vec![UnmatchedFace; output.unmatched_faces().len()];
            Ok::<_, ServiceError>(CompareFacesResponse {
                face_matches,
                unmatched_faces,
            })
        };
        self.with_timeout(COMPARE_FACES, call).await
    }
}
